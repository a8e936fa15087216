//! Voice Context - Value Objects

use serde::{Deserialize, Serialize};

use super::VoiceError;

/// 系统默认音色的占位标识
pub const DEFAULT_VOICE: &str = "default";

pub const SPEED_RANGE: std::ops::RangeInclusive<f32> = 0.5..=2.0;
pub const PITCH_RANGE: std::ops::RangeInclusive<f32> = 0.5..=2.0;
pub const VOLUME_RANGE: std::ops::RangeInclusive<f32> = 0.0..=1.0;

/// 合成参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// 音色标识，`default` 表示系统默认
    pub voice: String,
    /// 语速 (0.5 - 2.0)
    pub speed: f32,
    /// 音调 (0.5 - 2.0)
    pub pitch: f32,
    /// 音量 (0.0 - 1.0)
    pub volume: f32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            voice: DEFAULT_VOICE.to_string(),
            speed: 1.0,
            pitch: 1.0,
            volume: 0.8,
        }
    }
}

impl VoiceConfig {
    pub fn validate(&self) -> Result<(), VoiceError> {
        if self.voice.trim().is_empty() {
            return Err(VoiceError::InvalidName(self.voice.clone()));
        }
        if !SPEED_RANGE.contains(&self.speed) {
            return Err(VoiceError::OutOfRange {
                field: "speed",
                value: self.speed,
            });
        }
        if !PITCH_RANGE.contains(&self.pitch) {
            return Err(VoiceError::OutOfRange {
                field: "pitch",
                value: self.pitch,
            });
        }
        if !VOLUME_RANGE.contains(&self.volume) {
            return Err(VoiceError::OutOfRange {
                field: "volume",
                value: self.volume,
            });
        }
        Ok(())
    }

    pub fn is_system_default(&self) -> bool {
        self.voice == DEFAULT_VOICE
    }

    /// 按当前可用音色解析；不在列表中的音色回退到系统默认
    pub fn resolve(&self, catalog: &VoiceCatalog) -> VoiceConfig {
        let mut resolved = self.clone();
        if !self.is_system_default() && !catalog.contains(&self.voice) {
            tracing::warn!(voice = %self.voice, "Voice not available, using system default");
            resolved.voice = DEFAULT_VOICE.to_string();
        }
        resolved
    }
}

/// 引擎提供的音色
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceInfo {
    pub name: String,
    pub lang: String,
}

impl VoiceInfo {
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
        }
    }
}

/// 可用音色列表，引擎初始化较晚时可随时整体替换
#[derive(Debug, Clone, Default)]
pub struct VoiceCatalog {
    voices: Vec<VoiceInfo>,
}

impl VoiceCatalog {
    pub fn new(voices: Vec<VoiceInfo>) -> Self {
        Self { voices }
    }

    pub fn replace(&mut self, voices: Vec<VoiceInfo>) {
        self.voices = voices;
    }

    pub fn contains(&self, name: &str) -> bool {
        self.voices.iter().any(|v| v.name == name)
    }

    pub fn voices(&self) -> &[VoiceInfo] {
        &self.voices
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = VoiceConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.is_system_default());
        assert_eq!(config.volume, 0.8);
    }

    #[test]
    fn test_range_validation() {
        let config = VoiceConfig {
            speed: 2.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(VoiceError::OutOfRange { field: "speed", .. })
        ));

        let config = VoiceConfig {
            pitch: 0.4,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = VoiceConfig {
            volume: 1.1,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = VoiceConfig {
            speed: 0.5,
            pitch: 2.0,
            volume: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_voice_name_rejected() {
        let config = VoiceConfig {
            voice: " ".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(VoiceError::InvalidName(_))));
    }

    #[test]
    fn test_resolve_unknown_voice_falls_back() {
        let catalog = VoiceCatalog::new(vec![VoiceInfo::new("Alice", "en-US")]);

        let known = VoiceConfig {
            voice: "Alice".to_string(),
            ..Default::default()
        };
        assert_eq!(known.resolve(&catalog).voice, "Alice");

        let unknown = VoiceConfig {
            voice: "Bob".to_string(),
            speed: 1.5,
            ..Default::default()
        };
        let resolved = unknown.resolve(&catalog);
        assert_eq!(resolved.voice, DEFAULT_VOICE);
        assert_eq!(resolved.speed, 1.5);
    }

    #[test]
    fn test_catalog_replace() {
        let mut catalog = VoiceCatalog::default();
        assert!(catalog.is_empty());
        catalog.replace(vec![VoiceInfo::new("Alice", "en-US"), VoiceInfo::new("Li", "zh-CN")]);
        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains("Li"));
        catalog.replace(vec![]);
        assert!(!catalog.contains("Li"));
    }
}
