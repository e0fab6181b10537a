//! getUserMedia camera bound to the page's `<video>` and `<canvas>` elements

use std::cell::RefCell;

use async_trait::async_trait;
use js_sys::{Object, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, DomException, HtmlCanvasElement, HtmlVideoElement, MediaStream,
    MediaStreamConstraints, MediaStreamTrack, PermissionState, PermissionStatus,
};

use rps_domain::Capture;
use rps_player_ports::outbound::{CameraError, CameraPermission, CameraPort};
use rps_player_ports::CameraConfig;

/// `HTMLMediaElement.HAVE_METADATA`
const HAVE_METADATA: u16 = 1;

pub struct WebCamera {
    config: CameraConfig,
    stream: RefCell<Option<MediaStream>>,
}

impl WebCamera {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            stream: RefCell::new(None),
        }
    }

    /// Whether `navigator.mediaDevices.getUserMedia` exists. No side effects.
    pub fn browser_supports_capture() -> bool {
        let Some(window) = web_sys::window() else {
            return false;
        };
        match window.navigator().media_devices() {
            Ok(devices) => Reflect::has(&devices, &JsValue::from_str("getUserMedia")).unwrap_or(false),
            Err(_) => false,
        }
    }

    fn element<T: JsCast>(id: &str) -> Option<T> {
        web_sys::window()?
            .document()?
            .get_element_by_id(id)?
            .dyn_into::<T>()
            .ok()
    }

    fn video(&self) -> Option<HtmlVideoElement> {
        Self::element(&self.config.video_element_id)
    }

    fn canvas(&self) -> Option<HtmlCanvasElement> {
        Self::element(&self.config.canvas_element_id)
    }

    fn constraints(&self) -> Result<MediaStreamConstraints, JsValue> {
        let ideal = |value: u32| -> Result<Object, JsValue> {
            let obj = Object::new();
            Reflect::set(&obj, &"ideal".into(), &JsValue::from(value))?;
            Ok(obj)
        };

        let video = Object::new();
        Reflect::set(&video, &"width".into(), &ideal(self.config.width)?)?;
        Reflect::set(&video, &"height".into(), &ideal(self.config.height)?)?;
        Reflect::set(&video, &"facingMode".into(), &"user".into())?;

        let constraints = MediaStreamConstraints::new();
        constraints.set_video(&video);
        constraints.set_audio(&JsValue::FALSE);
        Ok(constraints)
    }

    async fn acquire(&self) -> Result<MediaStream, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let devices = window.navigator().media_devices()?;
        let promise = devices.get_user_media_with_constraints(&self.constraints()?)?;
        JsFuture::from(promise).await?.dyn_into::<MediaStream>()
    }

    async fn wait_for_metadata(video: &HtmlVideoElement) -> Result<(), JsValue> {
        if video.ready_state() >= HAVE_METADATA {
            return Ok(());
        }
        let loaded = Promise::new(&mut |resolve, _reject| {
            video.set_onloadedmetadata(Some(&resolve));
        });
        let result = JsFuture::from(loaded).await;
        video.set_onloadedmetadata(None);
        result.map(|_| ())
    }
}

/// Map a getUserMedia rejection onto the capture error taxonomy.
fn classify(err: JsValue) -> CameraError {
    match err.dyn_ref::<DomException>() {
        Some(exc) => match exc.name().as_str() {
            "NotAllowedError" | "SecurityError" => CameraError::PermissionDenied,
            name => CameraError::DeviceUnavailable(format!("{}: {}", name, exc.message())),
        },
        None => CameraError::DeviceUnavailable(
            err.as_string().unwrap_or_else(|| format!("{:?}", err)),
        ),
    }
}

#[async_trait(?Send)]
impl CameraPort for WebCamera {
    async fn open(&self) -> Result<(), CameraError> {
        if !Self::browser_supports_capture() {
            return Err(CameraError::DeviceUnavailable(
                "this browser does not support camera capture".to_string(),
            ));
        }
        self.close();

        let video = self.video().ok_or_else(|| {
            CameraError::DeviceUnavailable(format!(
                "missing <video id=\"{}\">",
                self.config.video_element_id
            ))
        })?;

        let stream = self.acquire().await.map_err(|e| {
            let err = classify(e);
            tracing::error!(error = %err, "Camera access failed");
            err
        })?;

        video.set_src_object(Some(&stream));
        *self.stream.borrow_mut() = Some(stream);

        if let Err(e) = Self::wait_for_metadata(&video).await {
            self.close();
            return Err(classify(e));
        }

        if let Some(canvas) = self.canvas() {
            canvas.set_width(self.config.width);
            canvas.set_height(self.config.height);
        }

        tracing::info!("Camera opened");
        Ok(())
    }

    fn close(&self) {
        if let Some(stream) = self.stream.borrow_mut().take() {
            for track in stream.get_tracks().iter() {
                if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                    track.stop();
                }
            }
            tracing::debug!("Camera closed");
        }
        if let Some(video) = self.video() {
            video.set_src_object(None);
        }
    }

    fn capture(&self) -> Result<Capture, CameraError> {
        if !self.is_active() {
            return Err(CameraError::NotInitialized);
        }
        let video = self.video().ok_or(CameraError::NotInitialized)?;
        let canvas = self.canvas().ok_or(CameraError::NotInitialized)?;

        let context = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or(CameraError::NotInitialized)?;

        context
            .draw_image_with_html_video_element_and_dw_and_dh(
                &video,
                0.0,
                0.0,
                f64::from(canvas.width()),
                f64::from(canvas.height()),
            )
            .map_err(classify)?;

        let data_url = canvas
            .to_data_url_with_type_and_encoder_options(
                "image/jpeg",
                &JsValue::from_f64(self.config.jpeg_quality),
            )
            .map_err(classify)?;

        Ok(Capture::from_data_url(data_url))
    }

    fn is_active(&self) -> bool {
        self.stream
            .borrow()
            .as_ref()
            .is_some_and(|stream| stream.active())
    }

    fn is_supported(&self) -> bool {
        Self::browser_supports_capture()
    }

    async fn query_permission(&self) -> CameraPermission {
        let query = async {
            let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
            let permissions = window.navigator().permissions()?;
            let descriptor = Object::new();
            Reflect::set(&descriptor, &"name".into(), &"camera".into())?;
            let status = JsFuture::from(permissions.query(&descriptor)?).await?;
            status.dyn_into::<PermissionStatus>()
        };

        match query.await {
            Ok(status) => match status.state() {
                PermissionState::Granted => CameraPermission::Granted,
                PermissionState::Denied => CameraPermission::Denied,
                PermissionState::Prompt => CameraPermission::Prompt,
                _ => CameraPermission::Unknown,
            },
            Err(e) => {
                tracing::debug!(error = ?e, "Permissions API unavailable");
                CameraPermission::Unknown
            }
        }
    }
}
