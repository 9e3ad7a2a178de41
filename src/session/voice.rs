// src/session/voice.rs
//! Microphone and speaker glue: capture a clip, upload it for transcription,
//! play synthesized questions back

use anyhow::Result;
use std::sync::Arc;

use crate::app_log;
use crate::core::{AudioClip, CoachApi};

/// Something that can start an exclusive audio capture (a microphone)
pub trait AudioSource: Send {
    fn open(&mut self) -> Result<Box<dyn AudioCapture>>;
}

/// A running capture; finishing it releases the device and yields the clip
pub trait AudioCapture: Send {
    fn finish(self: Box<Self>) -> Result<AudioClip>;
}

impl AudioSource for Box<dyn AudioSource> {
    fn open(&mut self) -> Result<Box<dyn AudioCapture>> {
        (**self).open()
    }
}

/// Plays back synthesized audio
pub trait AudioSink: Send {
    fn play(&mut self, audio: &[u8]) -> Result<()>;
}

/// Start/stop toggle around one [`AudioSource`]. Each start/stop pair uploads
/// the recorded clip to the transcription endpoint exactly once.
pub struct VoiceRecorder<S: AudioSource> {
    api: Arc<dyn CoachApi>,
    source: S,
    active: Option<Box<dyn AudioCapture>>,
}

impl<S: AudioSource> VoiceRecorder<S> {
    pub fn new(api: Arc<dyn CoachApi>, source: S) -> Self {
        Self {
            api,
            source,
            active: None,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    /// First call starts recording and returns `None`; the second stops, uploads,
    /// and returns the transcript. Errors are logged and yield `None`.
    pub async fn toggle(&mut self) -> Option<String> {
        let Some(capture) = self.active.take() else {
            match self.source.open() {
                Ok(capture) => {
                    app_log!(info, "Recording started");
                    self.active = Some(capture);
                }
                Err(e) => app_log!(error, "Error accessing microphone: {:#}", e),
            }
            return None;
        };

        let clip = match capture.finish() {
            Ok(clip) => clip,
            Err(e) => {
                app_log!(error, "Error stopping recording: {:#}", e);
                return None;
            }
        };
        app_log!(info, "Recording stopped ({} bytes), transcribing", clip.bytes.len());

        match self.api.listen(clip).await {
            Ok(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            Ok(_) => {
                app_log!(warn, "Transcription came back empty");
                None
            }
            Err(e) => {
                app_log!(error, "Transcription error: {:#}", e);
                None
            }
        }
    }
}

/// Request speech for `text` and hand it to `sink`. Returns whether audio played.
pub async fn speak_text(api: &dyn CoachApi, text: &str, sink: &mut dyn AudioSink) -> bool {
    let audio = match api.speak(text).await {
        Ok(audio) => audio,
        Err(e) => {
            app_log!(error, "TTS error: {:#}", e);
            return false;
        }
    };

    match sink.play(&audio) {
        Ok(()) => true,
        Err(e) => {
            app_log!(error, "Audio playback error: {:#}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::{shared, Call, FakeApi};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedMic {
        opened: Arc<AtomicUsize>,
        released: Arc<AtomicUsize>,
        fail_open: bool,
    }

    struct ScriptedCapture {
        released: Arc<AtomicUsize>,
    }

    impl AudioSource for ScriptedMic {
        fn open(&mut self) -> Result<Box<dyn AudioCapture>> {
            if self.fail_open {
                anyhow::bail!("permission denied");
            }
            self.opened.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(ScriptedCapture {
                released: self.released.clone(),
            }))
        }
    }

    impl AudioCapture for ScriptedCapture {
        fn finish(self: Box<Self>) -> Result<AudioClip> {
            self.released.fetch_add(1, Ordering::SeqCst);
            Ok(AudioClip {
                bytes: b"webm-bytes".to_vec(),
                file_name: "recording.webm".to_string(),
                mime: "audio/webm".to_string(),
            })
        }
    }

    #[derive(Default)]
    struct Speaker {
        played: Vec<Vec<u8>>,
    }

    impl AudioSink for Speaker {
        fn play(&mut self, audio: &[u8]) -> Result<()> {
            self.played.push(audio.to_vec());
            Ok(())
        }
    }

    fn mic(fail_open: bool) -> (ScriptedMic, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let opened = Arc::new(AtomicUsize::new(0));
        let released = Arc::new(AtomicUsize::new(0));
        (
            ScriptedMic {
                opened: opened.clone(),
                released: released.clone(),
                fail_open,
            },
            opened,
            released,
        )
    }

    fn listen_calls(api: &FakeApi) -> Vec<AudioClip> {
        api.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Listen(clip) => Some(clip),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_start_stop_uploads_exactly_once() {
        let api = shared(FakeApi {
            transcript_reply: Some(" I would shard by tenant. ".to_string()),
            ..Default::default()
        });
        let (source, opened, released) = mic(false);
        let mut recorder = VoiceRecorder::new(api.clone(), source);

        assert_eq!(recorder.toggle().await, None);
        assert!(recorder.is_recording());
        assert!(listen_calls(&api).is_empty());

        let transcript = recorder.toggle().await;
        assert_eq!(transcript.as_deref(), Some("I would shard by tenant."));
        assert!(!recorder.is_recording());

        let clips = listen_calls(&api);
        assert_eq!(clips.len(), 1);
        assert_eq!(clips[0].bytes, b"webm-bytes".to_vec());
        assert_eq!(opened.load(Ordering::SeqCst), 1);
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transcription_failure_is_swallowed() {
        let api = shared(FakeApi::default());
        let (source, _, released) = mic(false);
        let mut recorder = VoiceRecorder::new(api.clone(), source);

        recorder.toggle().await;
        assert_eq!(recorder.toggle().await, None);
        assert_eq!(listen_calls(&api).len(), 1);
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_denied_microphone_stays_idle() {
        let api = shared(FakeApi::default());
        let (source, opened, _) = mic(true);
        let mut recorder = VoiceRecorder::new(api.clone(), source);

        assert_eq!(recorder.toggle().await, None);
        assert!(!recorder.is_recording());
        assert_eq!(opened.load(Ordering::SeqCst), 0);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_speak_text_plays_audio() {
        let api = shared(FakeApi {
            speak_reply: Some(b"mp3".to_vec()),
            ..Default::default()
        });
        let mut speaker = Speaker::default();

        assert!(speak_text(api.as_ref(), "Why Rust?", &mut speaker).await);
        assert_eq!(speaker.played, vec![b"mp3".to_vec()]);
        assert_eq!(
            api.calls(),
            vec![Call::Speak {
                text: "Why Rust?".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_speak_failure_plays_nothing() {
        let api = shared(FakeApi::default());
        let mut speaker = Speaker::default();

        assert!(!speak_text(api.as_ref(), "Why Rust?", &mut speaker).await);
        assert!(speaker.played.is_empty());
    }
}
