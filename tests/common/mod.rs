use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

static COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Writes `content` to a unique file under the temp dir
pub fn write_temp(name: &str, content: &str) -> PathBuf {
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    let path = std::env::temp_dir().join(format!(
        "mlstockprice-it-{}-{}-{}",
        std::process::id(),
        n,
        name
    ));
    std::fs::write(&path, content).expect("write temp file");
    path
}
