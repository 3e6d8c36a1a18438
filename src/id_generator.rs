use std::sync::atomic::{AtomicU64, Ordering};

// Shared by every picked background so textures can be keyed by image
static NEXT_IMAGE_ID: AtomicU64 = AtomicU64::new(1);

pub fn generate_id() -> u64 {
    NEXT_IMAGE_ID.fetch_add(1, Ordering::SeqCst)
}
