mod wav;

#[cfg(test)]
pub(crate) use wav::{CaptureFlags, lock_recovering, report_capture_failure, to_pcm16};

pub use wav::WavCapture;
