//! Microphone capture through the Web Audio API.
//!
//! getUserMedia → AudioContext (fixed sample rate) → MediaStreamSource →
//! ScriptProcessor. Each `audioprocess` callback hands channel 0 of the
//! input buffer to the frame sink.

use async_trait::async_trait;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    AudioContext, AudioContextOptions, AudioProcessingEvent, MediaStream,
    MediaStreamAudioSourceNode, MediaStreamConstraints, MediaStreamTrack, ScriptProcessorNode,
};

use chat_core::ports::{AudioCapturePort, CaptureHandle, FrameSink};
use chat_types::{ChatError, Result, config::VoiceConfig};

#[derive(Default)]
pub struct BrowserAudioCapture;

impl BrowserAudioCapture {
    pub fn new() -> Self {
        Self
    }
}

fn js_err(kind: fn(String) -> ChatError) -> impl Fn(JsValue) -> ChatError {
    move |e| kind(format!("{:?}", e))
}

async fn request_microphone() -> Result<MediaStream> {
    let devices = gloo_utils::window()
        .navigator()
        .media_devices()
        .map_err(js_err(ChatError::Microphone))?;

    let constraints = MediaStreamConstraints::new();
    constraints.set_audio(&JsValue::TRUE);

    let promise = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(js_err(ChatError::Microphone))?;
    JsFuture::from(promise)
        .await
        .map_err(js_err(ChatError::Microphone))?
        .dyn_into::<MediaStream>()
        .map_err(js_err(ChatError::Microphone))
}

fn stop_stream(stream: &MediaStream) -> Result<()> {
    for track in stream.get_tracks().iter() {
        let track: MediaStreamTrack = track.dyn_into().map_err(js_err(ChatError::Microphone))?;
        track.stop();
    }
    Ok(())
}

#[async_trait(?Send)]
impl AudioCapturePort for BrowserAudioCapture {
    async fn open(&self, config: &VoiceConfig, on_frame: FrameSink) -> Result<Box<dyn CaptureHandle>> {
        let stream = request_microphone().await?;

        match build_pipeline(&stream, config, on_frame) {
            Ok((context, source, processor, callback)) => {
                log::info!("Microphone open at {} Hz", config.sample_rate);
                Ok(Box::new(BrowserCaptureHandle {
                    stream,
                    context,
                    source,
                    processor,
                    _onaudioprocess: callback,
                }))
            }
            Err(e) => {
                if let Err(stop) = stop_stream(&stream) {
                    log::warn!("Releasing microphone failed: {}", stop);
                }
                Err(e)
            }
        }
    }
}

type Pipeline = (
    AudioContext,
    MediaStreamAudioSourceNode,
    ScriptProcessorNode,
    Closure<dyn FnMut(AudioProcessingEvent)>,
);

fn build_pipeline(stream: &MediaStream, config: &VoiceConfig, on_frame: FrameSink) -> Result<Pipeline> {
    let options = AudioContextOptions::new();
    options.set_sample_rate(config.sample_rate as f32);
    let context = AudioContext::new_with_context_options(&options)
        .map_err(js_err(ChatError::Audio))?;

    match wire(&context, stream, config, on_frame) {
        Ok((source, processor, callback)) => Ok((context, source, processor, callback)),
        Err(e) => {
            let _ = context.close();
            Err(e)
        }
    }
}

fn wire(
    context: &AudioContext,
    stream: &MediaStream,
    config: &VoiceConfig,
    mut on_frame: FrameSink,
) -> Result<(MediaStreamAudioSourceNode, ScriptProcessorNode, Closure<dyn FnMut(AudioProcessingEvent)>)> {
    let source = context
        .create_media_stream_source(stream)
        .map_err(js_err(ChatError::Audio))?;
    let processor = context
        .create_script_processor_with_buffer_size_and_number_of_input_channels_and_number_of_output_channels(
            config.frame_size,
            config.channels as u32,
            config.channels as u32,
        )
        .map_err(js_err(ChatError::Audio))?;

    let callback = Closure::<dyn FnMut(AudioProcessingEvent)>::new(move |event: AudioProcessingEvent| {
        match event.input_buffer().and_then(|buffer| buffer.get_channel_data(0)) {
            Ok(samples) => on_frame(samples),
            Err(e) => log::warn!("Dropping audio block: {:?}", e),
        }
    });
    processor.set_onaudioprocess(Some(callback.as_ref().unchecked_ref()));

    source
        .connect_with_audio_node(&processor)
        .map_err(js_err(ChatError::Audio))?;
    processor
        .connect_with_audio_node(&context.destination())
        .map_err(js_err(ChatError::Audio))?;

    Ok((source, processor, callback))
}

/// Everything held while the microphone is open
struct BrowserCaptureHandle {
    stream: MediaStream,
    context: AudioContext,
    source: MediaStreamAudioSourceNode,
    processor: ScriptProcessorNode,
    _onaudioprocess: Closure<dyn FnMut(AudioProcessingEvent)>,
}

#[async_trait(?Send)]
impl CaptureHandle for BrowserCaptureHandle {
    fn stop_tracks(&self) -> Result<()> {
        stop_stream(&self.stream)
    }

    fn disconnect(&self) -> Result<()> {
        self.processor.set_onaudioprocess(None);
        self.source.disconnect().map_err(js_err(ChatError::Audio))?;
        self.processor.disconnect().map_err(js_err(ChatError::Audio))
    }

    async fn close(&self) -> Result<()> {
        let promise = self.context.close().map_err(js_err(ChatError::Audio))?;
        JsFuture::from(promise)
            .await
            .map_err(js_err(ChatError::Audio))?;
        Ok(())
    }
}
