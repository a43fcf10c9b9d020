// xbro overlay - MCSR Ranked match history as a Minecraft experience bar

pub mod core;
pub mod host;
