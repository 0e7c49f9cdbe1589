//! Live voice session controller.
//!
//! Idle → Recording → Stopping → Idle. While recording, every microphone frame is
//! converted to PCM, forwarded to the realtime transcription session and
//! retained for the final WAV artifact. Transcript fragments accumulate in
//! a live buffer that the UI can read at any time.
//!
//! Teardown releases each handle independently: a failing step is logged
//! and the remaining steps still run.

use std::cell::RefCell;
use std::rc::Rc;
use chat_types::{
    ChatError, Result,
    config::VoiceConfig,
    event::ChatEvent,
    message::OutgoingMessage,
};
use crate::codec::{encode_wav, PcmFrame};
use crate::event_bus::EventBus;
use crate::ports::*;

const WAV_MIME: &str = "audio/wav";

/// What `stop` hands back. Both fields are `None` when nothing was recording.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceRecording {
    pub audio_url: Option<String>,
    pub transcript: Option<String>,
}

impl VoiceRecording {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The outgoing message for the send path: only when both an audio
    /// reference and a non-blank transcript exist.
    pub fn into_outgoing(self) -> Option<OutgoingMessage> {
        match (self.audio_url, self.transcript) {
            (Some(url), Some(transcript)) if !transcript.trim().is_empty() => {
                Some(OutgoingMessage::text(transcript).with_audio(url))
            }
            _ => None,
        }
    }
}

/// Buffers shared with the frame and transcript callbacks of one recording
struct LiveBuffers {
    frames: Vec<Vec<f32>>,
    transcript: String,
    realtime: Option<Rc<dyn RealtimeTranscription>>,
    /// Cleared on teardown; late callbacks are ignored afterwards
    active: bool,
    failure: Option<String>,
}

impl LiveBuffers {
    fn new() -> Self {
        Self {
            frames: Vec::new(),
            transcript: String::new(),
            realtime: None,
            active: true,
            failure: None,
        }
    }
}

/// Every handle held by one recording
struct LiveVoiceSession {
    capture: Box<dyn CaptureHandle>,
    realtime: Rc<dyn RealtimeTranscription>,
    buffers: Rc<RefCell<LiveBuffers>>,
}

impl LiveVoiceSession {
    /// Release every handle, unconditionally. Returns the retained frames
    /// and transcript.
    async fn teardown(self) -> (Vec<Vec<f32>>, String, Option<String>) {
        {
            let mut live = self.buffers.borrow_mut();
            live.active = false;
            live.realtime = None;
        }
        release(self.capture.as_ref(), Some(self.realtime.as_ref())).await;

        let mut live = self.buffers.borrow_mut();
        (
            std::mem::take(&mut live.frames),
            std::mem::take(&mut live.transcript),
            live.failure.take(),
        )
    }
}

async fn release(capture: &dyn CaptureHandle, realtime: Option<&dyn RealtimeTranscription>) {
    if let Some(realtime) = realtime {
        if let Err(e) = realtime.close().await {
            log::warn!("Closing transcription session failed: {}", e);
        }
    }
    if let Err(e) = capture.stop_tracks() {
        log::warn!("Stopping microphone failed: {}", e);
    }
    if let Err(e) = capture.disconnect() {
        log::warn!("Disconnecting audio pipeline failed: {}", e);
    }
    if let Err(e) = capture.close().await {
        log::warn!("Closing audio context failed: {}", e);
    }
}

enum VoiceState {
    Idle,
    Starting,
    Recording(LiveVoiceSession),
    /// Teardown in progress; `start` stays a no-op until it returns
    Stopping,
}

pub struct VoiceSessionController {
    backend: RefCell<Rc<dyn ChatBackend>>,
    capture: Rc<dyn AudioCapturePort>,
    urls: Rc<dyn ObjectUrlPort>,
    voice: VoiceConfig,
    transcription: RefCell<TranscriptionConfig>,
    events: EventBus,
    state: RefCell<VoiceState>,
    current: RefCell<Option<Rc<RefCell<LiveBuffers>>>>,
}

impl VoiceSessionController {
    pub fn new(
        backend: Rc<dyn ChatBackend>,
        capture: Rc<dyn AudioCapturePort>,
        urls: Rc<dyn ObjectUrlPort>,
        voice: VoiceConfig,
        live_model: impl Into<String>,
        events: EventBus,
    ) -> Self {
        let transcription = TranscriptionConfig {
            model: live_model.into(),
            sample_rate: voice.sample_rate,
        };
        Self {
            backend: RefCell::new(backend),
            capture,
            urls,
            voice,
            transcription: RefCell::new(transcription),
            events,
            state: RefCell::new(VoiceState::Idle),
            current: RefCell::new(None),
        }
    }

    /// Used for recordings started after the call
    pub fn set_backend(&self, backend: Rc<dyn ChatBackend>, live_model: impl Into<String>) {
        *self.backend.borrow_mut() = backend;
        self.transcription.borrow_mut().model = live_model.into();
    }

    pub fn is_recording(&self) -> bool {
        matches!(*self.state.borrow(), VoiceState::Recording(_))
    }

    /// Transcript accumulated so far by the current recording
    pub fn live_transcript(&self) -> String {
        self.current
            .borrow()
            .as_ref()
            .map(|b| b.borrow().transcript.clone())
            .unwrap_or_default()
    }

    /// Start recording. No-op unless idle. Failures are logged, reported as
    /// `RecordingFailed`, and leave the controller idle with nothing held.
    pub async fn start(&self) {
        if !matches!(*self.state.borrow(), VoiceState::Idle) {
            log::debug!("Voice session busy; ignoring start");
            return;
        }
        *self.state.borrow_mut() = VoiceState::Starting;

        match self.open_session().await {
            Ok(session) => {
                *self.state.borrow_mut() = VoiceState::Recording(session);
                log::info!("Recording started");
                self.events.emit(ChatEvent::RecordingStarted);
            }
            Err(e) => {
                log::error!("Error starting recording: {}", e);
                *self.current.borrow_mut() = None;
                *self.state.borrow_mut() = VoiceState::Idle;
                self.events.emit(ChatEvent::RecordingFailed {
                    message: e.to_string(),
                });
            }
        }
    }

    async fn open_session(&self) -> Result<LiveVoiceSession> {
        let buffers = Rc::new(RefCell::new(LiveBuffers::new()));
        *self.current.borrow_mut() = Some(buffers.clone());

        let mime_type = self.voice.pcm_mime_type();
        let frame_buffers = buffers.clone();
        let on_frame: FrameSink = Box::new(move |samples: Vec<f32>| {
            let mut live = frame_buffers.borrow_mut();
            if !live.active {
                return;
            }
            let outbound = live
                .realtime
                .clone()
                .map(|realtime| (realtime, PcmFrame::from_samples(&samples, &mime_type)));
            live.frames.push(samples);
            drop(live);

            if let Some((realtime, frame)) = outbound {
                if let Err(e) = realtime.send_audio_frame(&frame) {
                    log::warn!("Dropping audio frame: {}", e);
                }
            }
        });

        let capture = self.capture.open(&self.voice, on_frame).await?;

        let sink_buffers = buffers.clone();
        let events = self.events.clone();
        let sink: RealtimeSink = Box::new(move |event: RealtimeEvent| {
            let mut live = sink_buffers.borrow_mut();
            if !live.active {
                return;
            }
            match event {
                RealtimeEvent::Transcript(text) => {
                    live.transcript.push_str(&text);
                    drop(live);
                    events.emit(ChatEvent::TranscriptDelta { text });
                }
                RealtimeEvent::Error(message) => {
                    log::error!("Live session error: {}", message);
                    live.failure = Some(message.clone());
                    drop(live);
                    events.emit(ChatEvent::RecordingFailed { message });
                }
                RealtimeEvent::Closed => {
                    log::info!("Live session closed");
                }
            }
        });

        let backend = self.backend.borrow().clone();
        let transcription = self.transcription.borrow().clone();
        let realtime = match backend.open_realtime_transcription(&transcription, sink).await {
            Ok(realtime) => realtime,
            Err(e) => {
                buffers.borrow_mut().active = false;
                release(capture.as_ref(), None).await;
                return Err(e);
            }
        };

        buffers.borrow_mut().realtime = Some(realtime.clone());
        Ok(LiveVoiceSession {
            capture,
            realtime,
            buffers,
        })
    }

    /// Stop recording and finalise the WAV artifact and transcript.
    ///
    /// Returns an empty recording, touching no resources, when not
    /// recording. A recording whose transcription session failed is torn
    /// down and discarded.
    pub async fn stop(&self) -> VoiceRecording {
        let Some(session) = self.take_recording() else {
            return VoiceRecording::empty();
        };

        let buffers = session.buffers.clone();
        let (frames, transcript, failure) = session.teardown().await;
        self.finish_teardown(&buffers);

        if let Some(reason) = failure {
            log::warn!("Discarding recording after session failure: {}", reason);
            return VoiceRecording::empty();
        }

        let samples: Vec<f32> = frames.concat();
        let wav = encode_wav(&samples, self.voice.sample_rate);
        let audio_url = match self.urls.create_object_url(&wav, WAV_MIME) {
            Ok(url) => Some(url),
            Err(e) => {
                log::error!("Could not publish recording: {}", e);
                None
            }
        };
        log::info!("Recording stopped: {} samples", samples.len());

        VoiceRecording {
            audio_url,
            transcript: Some(transcript),
        }
    }

    /// Tear down the current recording without producing an artifact.
    pub async fn abort(&self) -> Result<()> {
        let Some(session) = self.take_recording() else {
            return Err(ChatError::Voice("Not recording".to_string()));
        };

        let buffers = session.buffers.clone();
        session.teardown().await;
        self.finish_teardown(&buffers);
        log::info!("Recording aborted");
        Ok(())
    }

    /// Revoke the audio reference of a recording that will not be sent.
    pub fn discard(&self, recording: &VoiceRecording) {
        if let Some(ref url) = recording.audio_url {
            if let Err(e) = self.urls.revoke_object_url(url) {
                log::warn!("Could not revoke recording {}: {}", url, e);
            }
        }
    }

    /// Move a live recording into `Stopping`. Any other state is left as is.
    fn take_recording(&self) -> Option<LiveVoiceSession> {
        let mut state = self.state.borrow_mut();
        match std::mem::replace(&mut *state, VoiceState::Stopping) {
            VoiceState::Recording(session) => Some(session),
            other => {
                *state = other;
                None
            }
        }
    }

    fn finish_teardown(&self, buffers: &Rc<RefCell<LiveBuffers>>) {
        *self.state.borrow_mut() = VoiceState::Idle;
        let mut current = self.current.borrow_mut();
        if current.as_ref().is_some_and(|c| Rc::ptr_eq(c, buffers)) {
            *current = None;
        }
        drop(current);
        self.events.emit(ChatEvent::RecordingStopped);
    }
}
