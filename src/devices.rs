// src/devices.rs
//! Terminal audio devices: external recorder/player programs and plain files

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use crate::app_log;
use crate::core::{service_client::audio_content_type, AudioClip, FsOps};
use crate::session::{AudioCapture, AudioSink, AudioSource};

/// Records through an external program (`arecord` by default) into a temp file
pub struct CommandAudioSource {
    command: Vec<String>,
    dir: PathBuf,
}

impl CommandAudioSource {
    pub fn new(command: Vec<String>, dir: PathBuf) -> Self {
        Self { command, dir }
    }
}

impl AudioSource for CommandAudioSource {
    fn open(&mut self) -> Result<Box<dyn AudioCapture>> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| anyhow::anyhow!("No recorder command configured"))?;

        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create directory: {}", self.dir.display()))?;
        let path = FsOps::timestamped_path(&self.dir, "answer", "wav");

        let child = Command::new(program)
            .args(args)
            .arg(&path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to start recorder: {}", program))?;

        app_log!(debug, "Recorder {} started (pid {})", program, child.id());
        Ok(Box::new(CommandCapture {
            child,
            path,
            stopped: false,
        }))
    }
}

/// A running recorder. Dropping it stops the process and removes the temp file.
struct CommandCapture {
    child: Child,
    path: PathBuf,
    stopped: bool,
}

impl CommandCapture {
    fn stop(&mut self) -> Result<()> {
        if self.stopped {
            return Ok(());
        }
        self.stopped = true;

        // SIGINT lets recorders finalize the file header
        let interrupted = Command::new("kill")
            .arg("-INT")
            .arg(self.child.id().to_string())
            .status()
            .map(|s| s.success())
            .unwrap_or(false);
        if !interrupted {
            self.child.kill().ok();
        }
        self.child.wait().context("Failed to wait for recorder")?;
        Ok(())
    }
}

impl AudioCapture for CommandCapture {
    fn finish(mut self: Box<Self>) -> Result<AudioClip> {
        self.stop()?;
        read_clip(&self.path)
    }
}

impl Drop for CommandCapture {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            app_log!(warn, "Recorder did not stop cleanly: {:#}", e);
            self.child.kill().ok();
            self.child.wait().ok();
        }
        std::fs::remove_file(&self.path).ok();
    }
}

/// Uses a pre-recorded clip as the "microphone"
pub struct ClipFileSource {
    path: PathBuf,
}

impl ClipFileSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl AudioSource for ClipFileSource {
    fn open(&mut self) -> Result<Box<dyn AudioCapture>> {
        if !self.path.is_file() {
            anyhow::bail!("Audio clip not found: {}", self.path.display());
        }
        Ok(Box::new(ClipFileCapture {
            path: self.path.clone(),
        }))
    }
}

struct ClipFileCapture {
    path: PathBuf,
}

impl AudioCapture for ClipFileCapture {
    fn finish(self: Box<Self>) -> Result<AudioClip> {
        read_clip(&self.path)
    }
}

fn read_clip(path: &Path) -> Result<AudioClip> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read recording: {}", path.display()))?;
    if bytes.is_empty() {
        anyhow::bail!("Recording is empty: {}", path.display());
    }
    let file_name = FsOps::file_name_or(path, "recording.webm");
    Ok(AudioClip {
        mime: audio_content_type(&file_name).to_string(),
        file_name,
        bytes,
    })
}

/// Saves synthesized speech to disk and optionally hands it to a player program
pub struct FileAudioSink {
    dir: PathBuf,
    player: Option<Vec<String>>,
    last: Option<PathBuf>,
}

impl FileAudioSink {
    pub fn new(dir: PathBuf, player: Option<Vec<String>>) -> Self {
        Self {
            dir,
            player,
            last: None,
        }
    }

    /// Path of the most recently written audio file
    pub fn last_file(&self) -> Option<&Path> {
        self.last.as_deref()
    }
}

impl AudioSink for FileAudioSink {
    fn play(&mut self, audio: &[u8]) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create directory: {}", self.dir.display()))?;
        let path = FsOps::timestamped_path(&self.dir, "question", "mp3");
        std::fs::write(&path, audio)
            .with_context(|| format!("Failed to write audio: {}", path.display()))?;

        if let Some((program, args)) = self.player.as_ref().and_then(|p| p.split_first()) {
            let status = Command::new(program)
                .args(args)
                .arg(&path)
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .with_context(|| format!("Failed to start player: {}", program))?;
            if !status.success() {
                anyhow::bail!("Player {} exited with {}", program, status);
            }
        }

        self.last = Some(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answer.wav");
        std::fs::write(&path, b"RIFF0000WAVE").unwrap();

        let mut source = ClipFileSource::new(path);
        let clip = source.open().unwrap().finish().unwrap();
        assert_eq!(clip.file_name, "answer.wav");
        assert_eq!(clip.mime, "audio/wav");
        assert_eq!(clip.bytes, b"RIFF0000WAVE".to_vec());
    }

    #[test]
    fn test_missing_or_empty_clip() {
        let dir = tempfile::tempdir().unwrap();
        let mut missing = ClipFileSource::new(dir.path().join("nope.wav"));
        assert!(missing.open().is_err());

        let empty = dir.path().join("empty.webm");
        std::fs::write(&empty, b"").unwrap();
        let mut source = ClipFileSource::new(empty);
        assert!(source.open().unwrap().finish().is_err());
    }

    #[test]
    fn test_empty_recorder_command() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = CommandAudioSource::new(vec![], dir.path().to_path_buf());
        assert!(source.open().is_err());
    }

    fn shell_recorder(script: &str, dir: &Path) -> CommandAudioSource {
        let command = ["sh", "-c", script].iter().map(|s| s.to_string()).collect();
        CommandAudioSource::new(command, dir.to_path_buf())
    }

    fn wait_for(path: &Path) {
        for _ in 0..200 {
            if std::fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false) {
                return;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        panic!("{} never appeared", path.display());
    }

    fn wav_files(dir: &Path) -> usize {
        std::fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("wav"))
            .count()
    }

    #[cfg(unix)]
    #[test]
    fn test_recorder_finish_reads_and_removes_clip() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("written");
        let script = format!(
            "printf RIFF > \"$0\"; printf ok > {}; exec sleep 30",
            marker.display()
        );
        let mut source = shell_recorder(&script, dir.path());

        let capture = source.open().unwrap();
        wait_for(&marker);
        let clip = capture.finish().unwrap();

        assert_eq!(clip.bytes, b"RIFF".to_vec());
        assert_eq!(clip.mime, "audio/wav");
        assert_eq!(wav_files(dir.path()), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_dropped_recorder_is_stopped() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("recorder.pid");
        let script = format!(
            ": > \"$0\"; echo $$ > {}; exec sleep 37",
            pid_file.display()
        );
        let mut source = shell_recorder(&script, dir.path());

        let capture = source.open().unwrap();
        wait_for(&pid_file);
        let pid = std::fs::read_to_string(&pid_file).unwrap().trim().to_string();
        drop(capture);

        let alive = Command::new("kill")
            .args(["-0", &pid])
            .stderr(Stdio::null())
            .status()
            .unwrap()
            .success();
        assert!(!alive, "recorder {} still running", pid);
        assert_eq!(wav_files(dir.path()), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_read_still_removes_clip() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("written");
        let script = format!(": > \"$0\"; printf ok > {}; exec sleep 30", marker.display());
        let mut source = shell_recorder(&script, dir.path());

        let capture = source.open().unwrap();
        wait_for(&marker);
        assert!(capture.finish().is_err());
        assert_eq!(wav_files(dir.path()), 0);
    }

    #[test]
    fn test_file_sink_writes_audio() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileAudioSink::new(dir.path().join("audio"), None);

        sink.play(b"ID3").unwrap();
        let written = sink.last_file().unwrap().to_path_buf();
        assert_eq!(std::fs::read(&written).unwrap(), b"ID3".to_vec());
        assert_eq!(written.extension().and_then(|e| e.to_str()), Some("mp3"));
    }
}
