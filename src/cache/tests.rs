use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

fn ok_value(counter: &AtomicUsize, value: &str) -> Result<Arc<str>, String> {
    counter.fetch_add(1, Ordering::SeqCst);
    Ok(Arc::from(value))
}

#[test]
fn test_second_lookup_is_a_hit() {
    let cache: ResultCache = ResultCache::unbounded();
    let calls = AtomicUsize::new(0);

    let first = cache
        .get_or_compute("doc", "q", 0.6, || ok_value(&calls, "found"))
        .unwrap();
    let second = cache
        .get_or_compute("doc", "q", 0.6, || ok_value(&calls, "other"))
        .unwrap();

    assert!(!first.hit);
    assert!(second.hit);
    assert_eq!(&*second.value, "found");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_threshold_is_part_of_the_key() {
    let cache: ResultCache = ResultCache::unbounded();
    let calls = AtomicUsize::new(0);

    cache
        .get_or_compute("doc", "q", 0.6, || ok_value(&calls, "a"))
        .unwrap();
    let other = cache
        .get_or_compute("doc", "q", 0.65, || ok_value(&calls, "b"))
        .unwrap();

    assert!(!other.hit);
    assert_eq!(&*other.value, "b");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_errors_are_not_cached() {
    let cache: ResultCache = ResultCache::unbounded();

    let err = cache
        .get_or_compute("doc", "q", 0.6, || Err::<Arc<str>, _>("boom".to_string()))
        .unwrap_err();
    assert_eq!(err, "boom");
    assert!(!cache.contains("doc", "q", 0.6));

    let retry = cache
        .get_or_compute("doc", "q", 0.6, || Ok::<_, String>(Arc::from("ok")))
        .unwrap();
    assert!(!retry.hit);
    assert_eq!(&*retry.value, "ok");
}

#[test]
fn test_concurrent_misses_compute_once() {
    let cache: ResultCache = ResultCache::unbounded();
    let calls = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = cache.clone();
            let calls = calls.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                cache
                    .get_or_compute("doc", "q", 0.6, || {
                        calls.fetch_add(1, Ordering::SeqCst);
                        thread::sleep(Duration::from_millis(30));
                        Ok::<_, String>(Arc::from("shared"))
                    })
                    .unwrap()
            })
        })
        .collect();

    let lookups: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(lookups.iter().filter(|l| !l.hit).count(), 1);
    assert!(lookups.iter().all(|l| &*l.value == "shared"));
}

#[test]
fn test_insert_get_contains_clear() {
    let cache: ResultCache<u32> = ResultCache::default();
    assert!(cache.get("d", "q", 0.5).is_none());

    cache.insert("d", "q", 0.5, 7);
    assert_eq!(cache.get("d", "q", 0.5), Some(7));
    assert!(cache.contains("d", "q", 0.5));

    cache.run_pending_tasks();
    assert_eq!(cache.len(), 1);
    assert!(!cache.is_empty());

    cache.clear();
    cache.run_pending_tasks();
    assert!(cache.is_empty());
    assert!(!cache.contains("d", "q", 0.5));
}

#[test]
fn test_lru_policy_bounds_entries() {
    let cache: ResultCache<usize> = ResultCache::lru(4);
    for i in 0..32 {
        cache.insert(&format!("doc {i}"), "q", 0.5, i);
    }
    cache.run_pending_tasks();

    assert!(cache.len() <= 4);
}

#[test]
fn test_policy_from_capacity() {
    assert_eq!(CachePolicy::from_capacity(0), CachePolicy::Unbounded);
    assert_eq!(
        CachePolicy::from_capacity(16),
        CachePolicy::Lru { capacity: 16 }
    );
    assert_eq!(ResultCache::<u8>::lru(16).policy(), CachePolicy::Lru { capacity: 16 });
}

#[test]
fn test_clones_share_entries() {
    let cache: ResultCache = ResultCache::unbounded();
    let clone = cache.clone();

    clone.insert("d", "q", 0.5, Arc::from("v"));

    assert_eq!(cache.get("d", "q", 0.5).as_deref(), Some("v"));
    assert!(format!("{cache:?}").contains("Unbounded"));
}
