use candle_core::Device;
use tracing::{debug, warn};

/// Picks the compute device for the sentence encoder.
///
/// Tries Metal, then CUDA, when the matching feature is compiled in; otherwise (or when
/// no GPU answers) falls back to CPU.
pub fn select_device() -> Device {
    #[allow(unused_mut)]
    let mut failures: Vec<String> = Vec::new();

    #[cfg(feature = "metal")]
    match Device::new_metal(0) {
        Ok(device) => {
            tracing::info!("Sentence encoder using Metal");
            return device;
        }
        Err(e) => failures.push(format!("metal: {e}")),
    }

    #[cfg(feature = "cuda")]
    match Device::new_cuda(0) {
        Ok(device) => {
            tracing::info!("Sentence encoder using CUDA");
            return device;
        }
        Err(e) => failures.push(format!("cuda: {e}")),
    }

    if failures.is_empty() {
        debug!("No GPU backend compiled, using CPU");
    } else {
        warn!(reason = %failures.join("; "), "GPU unavailable, falling back to CPU");
    }

    Device::Cpu
}
