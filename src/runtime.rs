use std::sync::Once;

use log::trace;
use rayon::ThreadPoolBuilder;

static INIT: Once = Once::new();

/// Sizes the process-wide pool used for the data parallel sample conversion.
/// `None` leaves the global pool to rayon's defaults or to the host application.
/// Only the first call with a thread count has an effect, and a pool the host
/// already built is left untouched.
pub fn initialize(num_threads: Option<usize>) {
    let threads = match num_threads {
        Some(threads) => threads,
        None => return
    };
    INIT.call_once(|| {
        match ThreadPoolBuilder::new().num_threads(threads).build_global() {
            Ok(()) => trace!("global thread pool configured with {} threads", threads),
            Err(err) => trace!("keeping existing global thread pool: {}", err)
        }
    });
}

/// True once a thread count was passed to [`initialize`]
pub fn is_initialized() -> bool {
    INIT.is_completed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_explicit_thread_counts_configure_the_pool() {
        initialize(None);
        initialize(Some(2));
        assert!(is_initialized());
        // later calls are no-ops
        initialize(Some(3));
        assert!(is_initialized());
    }
}
