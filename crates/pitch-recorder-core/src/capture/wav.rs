use crate::{CaptureCompletion, CaptureError, CaptureService, CoreResult};

use std::{
    fs::{self, File},
    io::BufWriter,
    panic::Location,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicBool, Ordering},
        mpsc::Sender,
    },
};

use cpal::{
    Device, Stream, StreamConfig, StreamError,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::{debug, error, info, instrument, warn};

type SharedWriter = Arc<Mutex<Option<WavWriter<BufWriter<File>>>>>;

/// Convert a float sample in [-1, 1] to 16-bit PCM, clamping out-of-range input.
pub(crate) fn to_pcm16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16
}

/// Lock `mutex`, recovering the data if a previous holder panicked.
///
/// The guarded value is still valid after a poison, and giving up here
/// would lose the recording and its completion.
pub(crate) fn lock_recovering<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| {
        error!("Capture lock poisoned, recovering: {}", e);
        e.into_inner()
    })
}

/// Flags shared between the controller thread and the cpal callbacks of
/// one capture.
#[derive(Default)]
pub(crate) struct CaptureFlags {
    pub(crate) paused: AtomicBool,
    /// Set before the stream is dropped so no in-flight callback writes
    /// after the writer is taken for finalizing.
    pub(crate) shutdown: AtomicBool,
    pub(crate) failed: AtomicBool,
    /// Set by whoever sends the capture's completion.
    pub(crate) completed: AtomicBool,
}

impl CaptureFlags {
    /// Whether the callback should drop the incoming buffer.
    pub(crate) fn discarding(&self) -> bool {
        self.shutdown.load(Ordering::Acquire) || self.paused.load(Ordering::Acquire)
    }

    /// Returns true for exactly one caller per capture.
    pub(crate) fn claim_completion(&self) -> bool {
        !self.completed.swap(true, Ordering::AcqRel)
    }

    /// Whether the capture already ended on its own.
    pub(crate) fn ended(&self) -> bool {
        self.completed.load(Ordering::Acquire)
    }
}

/// End a capture from inside the audio thread: stop writing and send the
/// unsuccessful completion unless one was already sent.
pub(crate) fn report_capture_failure(
    flags: &CaptureFlags,
    completion_tx: &Sender<CaptureCompletion>,
    location: &Path,
) {
    flags.failed.store(true, Ordering::Release);
    flags.shutdown.store(true, Ordering::Release);

    if !flags.claim_completion() {
        return;
    }

    let completion = CaptureCompletion {
        success: false,
        location: location.to_path_buf(),
    };
    if let Err(e) = completion_tx.send(completion) {
        warn!(error = ?e, "Failed to deliver capture failure");
    }
}

struct ActiveCapture {
    stream: Stream,
    location: PathBuf,
}

/// Records a cpal input device into a 16-bit PCM WAV file.
///
/// Sends one [`CaptureCompletion`] per started capture: from `stop`, or from
/// the audio thread when the device disappears or a write fails.
pub struct WavCapture {
    device_name: Option<String>,
    device: Option<(Device, StreamConfig)>,
    active: Option<ActiveCapture>,
    writer: SharedWriter,
    flags: Arc<CaptureFlags>,
    completion_tx: Sender<CaptureCompletion>,
}

impl WavCapture {
    /// Create a capture for the named input device (default device when
    /// `None`). Completions are sent on `completion_tx`.
    pub fn new(device_name: Option<String>, completion_tx: Sender<CaptureCompletion>) -> Self {
        Self {
            device_name,
            device: None,
            active: None,
            writer: Arc::new(Mutex::new(None)),
            flags: Arc::new(CaptureFlags::default()),
            completion_tx,
        }
    }

    /// Whether a capture is open and still running.
    pub fn is_active(&self) -> bool {
        self.active.is_some() && !self.flags.ended()
    }

    #[track_caller]
    fn configure_session(&mut self) -> CoreResult<(Device, StreamConfig)> {
        if let Some((device, config)) = &self.device {
            return Ok((device.clone(), config.clone()));
        }

        let host = cpal::default_host();

        let device = match &self.device_name {
            Some(name) => find_input_device(&host, name)?,
            None => host
                .default_input_device()
                .ok_or(CaptureError::NoMicrophoneFound {
                    location: ErrorLocation::from(Location::caller()),
                })?,
        };

        let config = device
            .default_input_config()
            .map_err(|e| CaptureError::SessionConfigurationFailed {
                reason: format!("Failed to get input config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(
            device_id = ?device.id(),
            sample_rate = config.sample_rate(),
            channels = config.channels(),
            "Capture session configured"
        );

        let config: StreamConfig = config.into();
        self.device = Some((device.clone(), config.clone()));

        Ok((device, config))
    }

    #[track_caller]
    fn create_writer(
        location: &Path,
        config: &StreamConfig,
    ) -> CoreResult<WavWriter<BufWriter<File>>> {
        if let Some(parent) = location.parent() {
            fs::create_dir_all(parent).map_err(|e| CaptureError::RecorderConstructionFailed {
                path: location.to_path_buf(),
                reason: format!("Failed to create recordings directory: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;
        }

        let spec = WavSpec {
            channels: config.channels,
            sample_rate: config.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };

        WavWriter::create(location, spec).map_err(|e| CaptureError::RecorderConstructionFailed {
            path: location.to_path_buf(),
            reason: format!("Failed to create WAV writer: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    #[track_caller]
    fn build_stream(
        &self,
        device: &Device,
        config: &StreamConfig,
        location: &Path,
    ) -> CoreResult<Stream> {
        let writer = Arc::clone(&self.writer);
        let flags = Arc::clone(&self.flags);
        let error_flags = Arc::clone(&self.flags);
        let completion_tx = self.completion_tx.clone();
        let error_completion_tx = self.completion_tx.clone();
        let data_location = location.to_path_buf();
        let error_location = location.to_path_buf();

        let stream = device
            .build_input_stream(
                config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if flags.discarding() {
                        return;
                    }
                    let mut guard = lock_recovering(&writer);
                    if let Some(wav) = guard.as_mut() {
                        for &sample in data {
                            if let Err(e) = wav.write_sample(to_pcm16(sample)) {
                                error!("Failed to write sample: {}", e);
                                report_capture_failure(&flags, &completion_tx, &data_location);
                                return;
                            }
                        }
                    }
                },
                move |err| match err {
                    StreamError::DeviceNotAvailable => {
                        error!("Input device disappeared, ending capture");
                        report_capture_failure(&error_flags, &error_completion_tx, &error_location);
                    }
                    other => {
                        error!("Audio stream error: {}", other);
                        error_flags.failed.store(true, Ordering::Release);
                    }
                },
                None,
            )
            .map_err(|e| CaptureError::RecorderConstructionFailed {
                path: location.to_path_buf(),
                reason: format!("Failed to build stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        stream
            .play()
            .map_err(|e| CaptureError::RecorderConstructionFailed {
                path: location.to_path_buf(),
                reason: format!("Failed to start stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(stream)
    }

    /// Drop the stream and finalize the file. Returns whether the file was
    /// written completely.
    fn finish(&mut self, active: ActiveCapture) -> bool {
        self.flags.shutdown.store(true, Ordering::Release);
        drop(active.stream);
        // Let a callback that raced the shutdown flag finish before the
        // writer is taken.
        std::thread::sleep(std::time::Duration::from_millis(5));

        let writer = lock_recovering(&self.writer).take();
        let finalized = match writer {
            Some(wav) => {
                let frames = wav.duration();
                match wav.finalize() {
                    Ok(()) => {
                        debug!(frames, "WAV file finalized");
                        true
                    }
                    Err(e) => {
                        error!(error = ?e, "Failed to finalize WAV file");
                        false
                    }
                }
            }
            None => false,
        };

        finalized && !self.flags.failed.load(Ordering::Acquire)
    }

    #[track_caller]
    fn require_active(&self, operation: &str) -> CoreResult<()> {
        if !self.is_active() {
            return Err(CaptureError::DeviceError {
                reason: format!("Cannot {} without an active capture", operation),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }
}

impl CaptureService for WavCapture {
    #[track_caller]
    #[instrument(skip(self))]
    fn start(&mut self, location: &Path) -> CoreResult<()> {
        if let Some(active) = self.active.take() {
            if !self.flags.ended() {
                self.active = Some(active);
                return Err(CaptureError::SessionConfigurationFailed {
                    reason: "A capture is already running".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            // Ended on its own and already reported; release what is left.
            debug!(location = ?active.location, "Releasing capture that ended on its own");
            self.finish(active);
        }

        let (device, config) = self.configure_session()?;
        let writer = Self::create_writer(location, &config)?;

        self.flags = Arc::new(CaptureFlags::default());
        *lock_recovering(&self.writer) = Some(writer);

        let stream = match self.build_stream(&device, &config, location) {
            Ok(stream) => stream,
            Err(e) => {
                // Leave no half-written file behind.
                lock_recovering(&self.writer).take();
                if let Err(remove_err) = fs::remove_file(location) {
                    warn!(error = ?remove_err, "Failed to remove unused recording file");
                }
                return Err(e);
            }
        };

        self.active = Some(ActiveCapture {
            stream,
            location: location.to_path_buf(),
        });
        info!(location = ?location, "Audio capture started");

        Ok(())
    }

    #[track_caller]
    #[instrument(skip(self))]
    fn pause(&mut self) -> CoreResult<()> {
        self.require_active("pause")?;
        self.flags.paused.store(true, Ordering::Release);
        debug!("Audio capture paused");
        Ok(())
    }

    #[track_caller]
    #[instrument(skip(self))]
    fn resume(&mut self) -> CoreResult<()> {
        self.require_active("resume")?;
        self.flags.paused.store(false, Ordering::Release);
        debug!("Audio capture resumed");
        Ok(())
    }

    #[track_caller]
    #[instrument(skip(self))]
    fn stop(&mut self) -> CoreResult<()> {
        let Some(active) = self.active.take() else {
            debug!("Stop requested with no active capture");
            return Ok(());
        };

        let location = active.location.clone();
        let success = self.finish(active);
        info!(success, location = ?location, "Audio capture stopped");

        if !self.flags.claim_completion() {
            debug!("Completion already delivered by the audio thread");
            return Ok(());
        }

        self.completion_tx
            .send(CaptureCompletion { success, location })
            .map_err(|e| CaptureError::DeviceError {
                reason: format!("Failed to deliver capture completion: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    #[track_caller]
    #[instrument(skip(self))]
    fn deactivate_session(&mut self) -> CoreResult<()> {
        if self.is_active() {
            return Err(CaptureError::SessionDeactivationFailed {
                reason: "Capture is still running".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if let Some(active) = self.active.take() {
            self.finish(active);
        }

        if self.device.take().is_some() {
            debug!("Capture session deactivated");
        }

        Ok(())
    }
}

#[track_caller]
#[allow(deprecated)]
fn find_input_device(host: &cpal::Host, name: &str) -> CoreResult<Device> {
    let devices = host
        .input_devices()
        .map_err(|e| CaptureError::SessionConfigurationFailed {
            reason: format!("Failed to enumerate input devices: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    for device in devices {
        if device.name().map(|n| n == name).unwrap_or(false) {
            return Ok(device);
        }
    }

    Err(CaptureError::SessionConfigurationFailed {
        reason: format!("Input device not found: {}", name),
        location: ErrorLocation::from(Location::caller()),
    })
}
