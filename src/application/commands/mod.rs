//! 应用层 - 命令
//!
//! 用户操作（播放控制、导航、合成）的命令定义及处理器

mod playback_commands;

pub mod handlers;

pub use playback_commands::*;
