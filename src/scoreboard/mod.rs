pub mod builder;
pub mod parser;

pub use builder::Scoreboard;
pub use parser::BattleParser;
