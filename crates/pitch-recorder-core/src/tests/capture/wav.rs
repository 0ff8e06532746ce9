use crate::{
    CaptureCompletion, CaptureService, WavCapture,
    capture::{CaptureFlags, lock_recovering, report_capture_failure, to_pcm16},
};

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex, atomic::Ordering, mpsc},
};

/// WHAT: Float samples convert to full-scale 16-bit PCM
/// WHY: WAV files are written as 16-bit integers
#[test]
fn given_unit_range_samples_when_converting_then_full_scale_pcm() {
    assert_eq!(to_pcm16(0.0), 0);
    assert_eq!(to_pcm16(1.0), i16::MAX);
    assert_eq!(to_pcm16(-1.0), -i16::MAX);
    assert_eq!(to_pcm16(0.5), i16::MAX / 2);
}

/// WHAT: Out-of-range samples are clamped
/// WHY: Overdriven input must not wrap around to the opposite sign
#[test]
fn given_out_of_range_samples_when_converting_then_clamped() {
    assert_eq!(to_pcm16(3.0), i16::MAX);
    assert_eq!(to_pcm16(-7.5), -i16::MAX);
}

/// WHAT: The callback discards input while paused or shutting down
/// WHY: Paused time must not appear in the recording
#[test]
fn given_flags_when_paused_or_shutdown_then_discarding() {
    // Given: Fresh flags
    let flags = CaptureFlags::default();
    assert!(!flags.discarding());

    // When/Then: Paused
    flags.paused.store(true, Ordering::Release);
    assert!(flags.discarding());

    // When/Then: Resumed but shutting down
    flags.paused.store(false, Ordering::Release);
    flags.shutdown.store(true, Ordering::Release);
    assert!(flags.discarding());
}

/// WHAT: Only the first claim on a capture's completion succeeds
/// WHY: The audio thread and stop both try to report; one may win
#[test]
fn given_flags_when_claiming_completion_twice_then_only_first_wins() {
    let flags = CaptureFlags::default();
    assert!(!flags.ended());

    assert!(flags.claim_completion());
    assert!(!flags.claim_completion());
    assert!(flags.ended());
}

/// WHAT: A stream failure sends one unsuccessful completion and stops writing
/// WHY: An unplugged microphone must end the session without waiting for stop
#[test]
#[allow(clippy::unwrap_used)]
fn given_stream_failure_when_reported_twice_then_one_unsuccessful_completion() {
    // Given: Running capture flags
    let flags = CaptureFlags::default();
    let (tx, rx) = mpsc::channel();
    let location = PathBuf::from("/recordings/12122014-090503.wav");

    // When: The device error fires twice
    report_capture_failure(&flags, &tx, &location);
    report_capture_failure(&flags, &tx, &location);

    // Then: Exactly one failed completion for the file
    let completion = rx.try_recv().unwrap();
    assert_eq!(
        completion,
        CaptureCompletion {
            success: false,
            location,
        }
    );
    assert!(rx.try_recv().is_err());

    // Then: Input is discarded and a later stop cannot report again
    assert!(flags.discarding());
    assert!(flags.failed.load(Ordering::Acquire));
    assert!(!flags.claim_completion());
}

/// WHAT: A stream failure after stop already reported sends nothing
/// WHY: Exactly one completion per started capture
#[test]
fn given_completion_claimed_when_stream_fails_then_nothing_sent() {
    let flags = CaptureFlags::default();
    let (tx, rx) = mpsc::channel();
    assert!(flags.claim_completion());

    report_capture_failure(&flags, &tx, Path::new("/recordings/x.wav"));

    assert!(rx.try_recv().is_err());
}

/// WHAT: A poisoned writer lock still yields its contents
/// WHY: A panic in the audio callback must not lose the file or its completion
#[test]
#[allow(clippy::panic)]
fn given_poisoned_lock_when_taking_writer_then_value_recovered() {
    // Given: A slot whose lock was poisoned by a panicking holder
    let slot = Arc::new(Mutex::new(Some(42u32)));
    let poisoner = Arc::clone(&slot);
    let _ = std::thread::spawn(move || {
        let _guard = poisoner.lock();
        panic!("callback panicked");
    })
    .join();
    assert!(slot.is_poisoned());

    // When: Taking the value
    let taken = lock_recovering(&slot).take();

    // Then: The value survives the poison
    assert_eq!(taken, Some(42));
    assert_eq!(*lock_recovering(&slot), None);
}

/// WHAT: Stop without a capture sends no completion
/// WHY: Exactly one completion per started capture
#[test]
#[allow(clippy::unwrap_used)]
fn given_no_active_capture_when_stopping_then_no_completion_sent() {
    // Given: An idle WAV capture
    let (tx, rx) = mpsc::channel::<CaptureCompletion>();
    let mut capture = WavCapture::new(None, tx);

    // When: Stopping and deactivating
    capture.stop().unwrap();
    capture.deactivate_session().unwrap();

    // Then: Nothing delivered
    assert!(rx.try_recv().is_err());
    assert!(!capture.is_active());
}

/// WHAT: Pause and resume require an open capture
/// WHY: Toggling a capture that never started is a caller bug to surface
#[test]
fn given_no_active_capture_when_pausing_or_resuming_then_error() {
    let (tx, _rx) = mpsc::channel();
    let mut capture = WavCapture::new(None, tx);

    assert!(capture.pause().is_err());
    assert!(capture.resume().is_err());
}

/// WHAT: A full start/stop cycle writes a WAV file and one completion
/// WHY: Validates the cpal + hound path on real hardware
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
#[allow(clippy::unwrap_used)]
fn given_microphone_when_recording_then_wav_written_and_completion_sent() {
    // Given: A WAV capture into the temp directory
    let (tx, rx) = mpsc::channel();
    let mut capture = WavCapture::new(None, tx);
    let path = std::env::temp_dir()
        .join("pitch-recorder-test")
        .join("capture.wav");

    // When: Recording briefly with a pause in the middle
    capture.start(&path).unwrap();
    std::thread::sleep(std::time::Duration::from_millis(200));
    capture.pause().unwrap();
    capture.resume().unwrap();
    std::thread::sleep(std::time::Duration::from_millis(200));
    capture.stop().unwrap();
    capture.deactivate_session().unwrap();

    // Then: One successful completion for the file
    let completion = rx.try_recv().unwrap();
    assert!(completion.success);
    assert_eq!(completion.location, path);
    assert!(rx.try_recv().is_err());
    assert!(Path::new(&path).exists());
}
