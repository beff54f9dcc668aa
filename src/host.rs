//! Side effects the reader asks of its surroundings: sounds, fullscreen, and
//! the URL fragment.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sound {
    Click,
}

pub trait Host {
    fn play_sound(&mut self, sound: Sound) -> anyhow::Result<()>;
    fn is_fullscreen(&self) -> bool;
    fn request_fullscreen(&mut self) -> anyhow::Result<()>;
    fn exit_fullscreen(&mut self) -> anyhow::Result<()>;
    fn set_fragment(&mut self, fragment: &str);
}

/// In-memory host that records every request.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    pub sounds: Vec<Sound>,
    pub fullscreen: bool,
    pub fragments: Vec<String>,
    pub fail_sounds: bool,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragments.last().map(String::as_str)
    }
}

impl Host for RecordingHost {
    fn play_sound(&mut self, sound: Sound) -> anyhow::Result<()> {
        if self.fail_sounds {
            anyhow::bail!("audio output unavailable");
        }
        self.sounds.push(sound);
        Ok(())
    }

    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn request_fullscreen(&mut self) -> anyhow::Result<()> {
        self.fullscreen = true;
        Ok(())
    }

    fn exit_fullscreen(&mut self) -> anyhow::Result<()> {
        self.fullscreen = false;
        Ok(())
    }

    fn set_fragment(&mut self, fragment: &str) {
        self.fragments.push(fragment.to_owned());
    }
}
