use sonic_core::{AnalysisTap, FrameSample, TapSettings, TapStatus, VisualizerError};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

// Audio nodes behind the tap. Shared with the resume task spawned when the
// context starts out suspended.
#[derive(Default)]
struct Graph {
    ctx: Option<web::AudioContext>,
    analyser: Option<web::AnalyserNode>,
    source: Option<web::MediaElementAudioSourceNode>,
    connecting: bool,
}

/// WebAudio analyser tapped off an `<audio>` element.
pub struct WebTap {
    settings: TapSettings,
    graph: Rc<RefCell<Graph>>,
}

fn js_err(e: &JsValue) -> String {
    format!("{:?}", e)
}

fn is_invalid_state(e: &JsValue) -> bool {
    e.dyn_ref::<web::DomException>()
        .map(|d| d.name() == "InvalidStateError")
        .unwrap_or(false)
}

impl Graph {
    // Create the context and analyser on first use
    fn ensure_nodes(&mut self, settings: &TapSettings) -> Result<(), VisualizerError> {
        if self.ctx.is_some() && self.analyser.is_some() {
            return Ok(());
        }
        let ctx = web::AudioContext::new()
            .map_err(|e| VisualizerError::Unsupported(js_err(&e)))?;
        let analyser = web::AnalyserNode::new(&ctx)
            .map_err(|e| VisualizerError::Unsupported(js_err(&e)))?;
        analyser.set_fft_size(settings.fft_size);
        analyser.set_smoothing_time_constant(settings.smoothing);
        log::info!(
            "analyser ready: fft={} bins={}",
            settings.fft_size,
            analyser.frequency_bin_count()
        );
        self.ctx = Some(ctx);
        self.analyser = Some(analyser);
        Ok(())
    }

    // source -> analyser -> destination, so playback stays audible
    fn wire(&mut self, media: &web::HtmlMediaElement) -> Result<(), VisualizerError> {
        let (Some(ctx), Some(analyser)) = (&self.ctx, &self.analyser) else {
            return Err(VisualizerError::Platform("audio graph not initialized".into()));
        };
        let source = ctx.create_media_element_source(media).map_err(|e| {
            if is_invalid_state(&e) {
                VisualizerError::SourceAlreadyConnected
            } else {
                VisualizerError::Platform(js_err(&e))
            }
        })?;
        source
            .connect_with_audio_node(analyser)
            .map_err(|e| VisualizerError::Platform(js_err(&e)))?;
        analyser
            .connect_with_audio_node(&ctx.destination())
            .map_err(|e| VisualizerError::Platform(js_err(&e)))?;
        self.source = Some(source);
        Ok(())
    }
}

impl WebTap {
    pub fn new(settings: TapSettings) -> Self {
        Self {
            settings,
            graph: Rc::new(RefCell::new(Graph::default())),
        }
    }
}

impl AnalysisTap for WebTap {
    type Source = web::HtmlMediaElement;

    fn connect(&mut self, media: &web::HtmlMediaElement) -> Result<TapStatus, VisualizerError> {
        let mut graph = self.graph.borrow_mut();
        if graph.source.is_some() {
            return Ok(TapStatus::Connected);
        }
        if graph.connecting {
            return Ok(TapStatus::Pending);
        }
        graph.ensure_nodes(&self.settings)?;

        let suspended = graph
            .ctx
            .as_ref()
            .map(|c| c.state() == web::AudioContextState::Suspended)
            .unwrap_or(false);
        if !suspended {
            graph.wire(media)?;
            return Ok(TapStatus::Connected);
        }

        // Autoplay policy: wait for the context to resume before wiring
        let promise = match graph.ctx.as_ref().map(|c| c.resume()) {
            Some(Ok(p)) => p,
            Some(Err(e)) => return Err(VisualizerError::Platform(js_err(&e))),
            None => return Err(VisualizerError::Platform("no audio context".into())),
        };
        graph.connecting = true;
        let shared = self.graph.clone();
        let media = media.clone();
        spawn_local(async move {
            let resumed = JsFuture::from(promise).await;
            let mut graph = shared.borrow_mut();
            graph.connecting = false;
            if let Err(e) = resumed {
                log::error!("audio context resume failed: {:?}", e);
                return;
            }
            match graph.wire(&media) {
                Ok(()) => log::info!("audio tap connected after resume"),
                Err(VisualizerError::SourceAlreadyConnected) => {
                    log::warn!("media source already wrapped elsewhere; visualizer stays disconnected")
                }
                Err(e) => log::error!("audio tap wiring failed: {}", e),
            }
        });
        Ok(TapStatus::Pending)
    }

    fn is_attached(&self) -> bool {
        let graph = self.graph.borrow();
        graph.source.is_some() || graph.connecting
    }

    fn is_ready(&self) -> bool {
        let graph = self.graph.borrow();
        graph.source.is_some() && graph.analyser.is_some()
    }

    fn resume(&mut self) {
        if let Some(ctx) = &self.graph.borrow().ctx {
            if ctx.state() == web::AudioContextState::Suspended {
                _ = ctx.resume();
            }
        }
    }

    fn sample(&mut self, frame: &mut FrameSample) {
        if let Some(analyser) = &self.graph.borrow().analyser {
            analyser.get_byte_time_domain_data(&mut frame.time_domain);
            analyser.get_byte_frequency_data(&mut frame.frequency);
        }
    }

    fn release(&mut self) {
        let mut graph = self.graph.borrow_mut();
        if let Some(source) = graph.source.take() {
            _ = source.disconnect();
        }
        if let Some(analyser) = graph.analyser.take() {
            _ = analyser.disconnect();
        }
        if let Some(ctx) = graph.ctx.take() {
            if ctx.state() != web::AudioContextState::Closed {
                _ = ctx.close();
            }
        }
        graph.connecting = false;
    }
}
