use fanout_cache::{keys, Cache, MemoryCache};

#[tokio_shared_rt::test]
async fn sets() {
    let cache = MemoryCache::new();
    let key = keys::subscribe_form("hostcreate");

    assert!(cache.sadd(&key, "1").await.unwrap());
    assert!(!cache.sadd(&key, "1").await.unwrap());
    assert!(cache.sadd(&key, "2").await.unwrap());

    let members = cache.smembers(&key).await.unwrap();
    assert_eq!(members.into_iter().collect::<Vec<_>>(), vec!["1", "2"]);

    assert!(cache.srem(&key, "1").await.unwrap());
    assert!(!cache.srem(&key, "1").await.unwrap());
    assert!(cache.srem(&key, "2").await.unwrap());
    assert!(!cache.exists(&key));
    assert!(!cache.srem("subscribeform:unknown", "2").await.unwrap());
}

#[tokio_shared_rt::test]
async fn del_any_type() {
    let cache = MemoryCache::new();
    let state = keys::delivery_state(7);

    assert_eq!(
        state,
        vec!["dist:id:7", "dist:queue:7", "dist:done:7"]
    );

    cache.sadd(&state[0], "a").await.unwrap();
    cache.rpush(&state[1], "event");
    cache.hset(&state[2], "a", "1");

    assert_eq!(cache.del(&state).await.unwrap(), 3);
    assert!(state.iter().all(|key| !cache.exists(key)));
    assert_eq!(cache.del(&state).await.unwrap(), 0);
}

#[tokio_shared_rt::test]
async fn hashes() {
    let cache = MemoryCache::new();
    let key = keys::callback_count(3);

    assert!(cache.hgetall(&key).await.unwrap().is_empty());

    cache.hset(&key, keys::COUNT_TOTAL_FIELD, "12");
    cache.hset(&key, keys::COUNT_FAILURE_FIELD, "2");

    let values = cache.hgetall(&key).await.unwrap();
    assert_eq!(values.get("total").map(String::as_str), Some("12"));
    assert_eq!(values.get("failue").map(String::as_str), Some("2"));
}

#[tokio_shared_rt::test]
async fn publish() {
    let cache = MemoryCache::new();

    assert_eq!(cache.publish(keys::PROCESS_CHANNEL, "nobody").await.unwrap(), 0);

    let mut receiver = cache.subscribe();
    assert_eq!(cache.publish(keys::PROCESS_CHANNEL, "first").await.unwrap(), 1);
    cache.publish(keys::PROCESS_CHANNEL, "second").await.unwrap();

    let message = receiver.recv().await.unwrap();
    assert_eq!(message.channel, "event:process");
    assert_eq!(message.payload, "first");
    assert_eq!(receiver.recv().await.unwrap().payload, "second");
}
