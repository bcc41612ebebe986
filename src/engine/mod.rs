// Engine modules: animation playback, audio/effect sink, input plumbing, frame clock

pub mod animation;
pub mod audio;
pub mod game_loop;
pub mod input;
