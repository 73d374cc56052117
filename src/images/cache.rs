//! Coalescing in-memory image cache.
//!
//! [`ImageCache::get_image`] never fails: a fetch or decode error resolves to
//! `None` so a list row can fall back to a placeholder. Concurrent requests
//! for the same URL share one in-flight fetch through a pending table keyed by
//! URL; every waiter receives the same `Arc` once it resolves.

use super::lru::LruStore;
use crate::domain::FetchError;
use crate::transport::ImageSource;
use crate::Config;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use image::DynamicImage;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// A decoded image shared between the cache and its consumers.
pub type CachedImage = Arc<DynamicImage>;

type PendingFetch = Shared<BoxFuture<'static, Option<CachedImage>>>;

/// Process-wide image cache, cheap to clone.
///
/// Clones share the same storage and pending table. The cache synchronizes
/// internally and never holds its lock across an await point.
#[derive(Clone)]
pub struct ImageCache {
    inner: Arc<Inner>,
}

struct Inner {
    source: Arc<dyn ImageSource>,
    state: Mutex<CacheState>,
}

struct CacheState {
    store: LruStore<CachedImage>,
    pending: HashMap<String, PendingFetch>,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("ImageCache")
            .field("entries", &state.store.len())
            .field("bytes", &state.store.bytes())
            .field("pending", &state.pending.len())
            .finish()
    }
}

impl ImageCache {
    /// Creates a cache bounded by `max_bytes` of decoded pixel data and,
    /// optionally, by `max_entries` images.
    #[must_use]
    pub fn new(source: Arc<dyn ImageSource>, max_bytes: usize, max_entries: Option<usize>) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                state: Mutex::new(CacheState {
                    store: LruStore::new(max_bytes, max_entries),
                    pending: HashMap::new(),
                }),
            }),
        }
    }

    /// Creates a cache sized from `config`.
    #[must_use]
    pub fn from_config(source: Arc<dyn ImageSource>, config: &Config) -> Self {
        Self::new(source, config.image_cache_bytes, config.image_cache_entries)
    }

    /// Returns the decoded image behind `url`, or `None` if it cannot be
    /// fetched or decoded.
    ///
    /// A hit returns without I/O. A miss joins the in-flight fetch for `url`
    /// if there is one, otherwise starts it. Successful results are stored
    /// before any waiter is woken; failures are not stored, so a later call
    /// retries.
    pub async fn get_image(&self, url: &str) -> Option<CachedImage> {
        let fetch = {
            let mut state = self.inner.lock();

            if let Some(image) = state.store.get(url) {
                tracing::trace!(url = %url, "image cache hit");
                return Some(image);
            }

            if let Some(pending) = state.pending.get(url) {
                tracing::debug!(url = %url, "joining in-flight image fetch");
                pending.clone()
            } else {
                tracing::debug!(url = %url, "image cache miss, fetching");
                let fetch = Self::fetch(
                    Arc::downgrade(&self.inner),
                    Arc::clone(&self.inner.source),
                    url.to_string(),
                )
                .boxed()
                .shared();
                state.pending.insert(url.to_string(), fetch.clone());
                fetch
            }
        };

        fetch.await
    }

    async fn fetch(
        inner: Weak<Inner>,
        source: Arc<dyn ImageSource>,
        url: String,
    ) -> Option<CachedImage> {
        let result = match source.fetch_bytes(&url).await {
            Ok(bytes) => decode(bytes).await,
            Err(e) => Err(e),
        };

        let Some(inner) = inner.upgrade() else {
            return result.ok();
        };

        let mut state = inner.lock();
        state.pending.remove(&url);

        match result {
            Ok(image) => {
                let size = image.as_bytes().len();
                if !state.store.insert(url.clone(), Arc::clone(&image), size) {
                    tracing::debug!(url = %url, bytes = size, "image exceeds cache budget, not cached");
                }
                Some(image)
            }
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "image fetch failed");
                None
            }
        }
    }

    /// Returns `true` if `url` is cached (without touching recency).
    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.inner.lock().store.contains(url)
    }

    /// Drops the cached image for `url`, if any.
    pub fn evict(&self, url: &str) -> Option<CachedImage> {
        self.inner.lock().store.remove(url)
    }

    /// Drops every cached image. In-flight fetches are unaffected.
    pub fn clear(&self) {
        self.inner.lock().store.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().store.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().store.is_empty()
    }

    /// Decoded bytes currently held.
    #[must_use]
    pub fn cached_bytes(&self) -> usize {
        self.inner.lock().store.bytes()
    }

    /// Number of URLs with a fetch in flight.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inner.lock().pending.len()
    }
}

/// Decodes image bytes off the async executor.
async fn decode(bytes: Vec<u8>) -> Result<CachedImage, FetchError> {
    tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
        .await
        .map_err(|e| FetchError::ImageDecode(e.to_string()))?
        .map(Arc::new)
        .map_err(|e| FetchError::ImageDecode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Semaphore;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let pixels = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 128, 0, 255]));
        let mut buf = std::io::Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(pixels)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    /// Image source that blocks every fetch until released.
    struct GatedSource {
        calls: AtomicUsize,
        gate: Semaphore,
        response: Mutex<Result<Vec<u8>, FetchError>>,
    }

    impl GatedSource {
        fn new(response: Result<Vec<u8>, FetchError>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                gate: Semaphore::new(0),
                response: Mutex::new(response),
            }
        }

        fn open(response: Result<Vec<u8>, FetchError>) -> Self {
            let source = Self::new(response);
            source.release();
            source
        }

        fn release(&self) {
            self.gate.add_permits(1_000);
        }

        fn set_response(&self, response: Result<Vec<u8>, FetchError>) {
            *self.response.lock().unwrap() = response;
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ImageSource for GatedSource {
        async fn fetch_bytes(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let _permit = self.gate.acquire().await.unwrap();
            self.response.lock().unwrap().clone()
        }
    }

    #[tokio::test]
    async fn concurrent_requests_share_one_fetch() {
        let source = Arc::new(GatedSource::new(Ok(png_bytes(4, 4))));
        let cache = ImageCache::new(source.clone(), 1 << 20, None);

        let waiters: Vec<_> = (0..5)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move { cache.get_image("url-A").await })
            })
            .collect();

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(source.calls(), 1);
        assert_eq!(cache.pending(), 1);

        source.release();

        let mut results = Vec::new();
        for waiter in waiters {
            results.push(waiter.await.unwrap().expect("image should resolve"));
        }

        assert_eq!(source.calls(), 1);
        assert!(results.iter().all(|img| Arc::ptr_eq(img, &results[0])));
        assert!(cache.contains("url-A"));
        assert_eq!(cache.pending(), 0);
    }

    #[tokio::test]
    async fn hit_does_not_refetch() {
        let source = Arc::new(GatedSource::open(Ok(png_bytes(2, 2))));
        let cache = ImageCache::new(source.clone(), 1 << 20, None);

        let first = cache.get_image("url-A").await.unwrap();
        let second = cache.get_image("url-A").await.unwrap();

        assert_eq!(source.calls(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.cached_bytes(), 2 * 2 * 4);
    }

    #[tokio::test]
    async fn failed_fetch_is_not_cached() {
        let source = Arc::new(GatedSource::open(Err(FetchError::Http(503))));
        let cache = ImageCache::new(source.clone(), 1 << 20, None);

        assert!(cache.get_image("url-A").await.is_none());
        assert!(cache.is_empty());

        source.set_response(Ok(png_bytes(1, 1)));
        assert!(cache.get_image("url-A").await.is_some());
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn undecodable_bytes_resolve_to_none() {
        let source = Arc::new(GatedSource::open(Ok(b"definitely not an image".to_vec())));
        let cache = ImageCache::new(source, 1 << 20, None);

        assert!(cache.get_image("url-A").await.is_none());
        assert!(!cache.contains("url-A"));
    }

    #[tokio::test]
    async fn budget_evicts_older_images() {
        let source = Arc::new(GatedSource::open(Ok(png_bytes(4, 4))));
        // Each 4x4 RGBA image is 64 bytes; room for two.
        let cache = ImageCache::new(source, 128, None);

        cache.get_image("a").await.unwrap();
        cache.get_image("b").await.unwrap();
        cache.get_image("c").await.unwrap();

        assert_eq!(cache.len(), 2);
        assert!(!cache.contains("a"));
        assert!(cache.contains("c"));
    }

    #[tokio::test]
    async fn oversized_image_is_returned_but_not_cached() {
        let source = Arc::new(GatedSource::open(Ok(png_bytes(8, 8))));
        let cache = ImageCache::new(source, 16, None);

        assert!(cache.get_image("big").await.is_some());
        assert!(cache.is_empty());
    }
}
