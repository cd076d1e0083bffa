use fanout_store::{
    Condition, ConfirmMode, FindArgs, Page, Store, StoreError, Subscription,
};
use futures_util::future::join_all;
use serde_json::Value;

pub fn subscription(name: &str, form: &str) -> Subscription {
    Subscription {
        subscription_name: name.to_owned(),
        system_name: "cmdb".to_owned(),
        callback_url: "http://127.0.0.1:8080/callback".to_owned(),
        confirm_mode: ConfirmMode::HttpStatus,
        confirm_pattern: "200".to_owned(),
        subscription_form: form.to_owned(),
        time_out: 10,
        operator: "admin".to_owned(),
        ..Default::default()
    }
}

fn by(key: &str, value: impl Into<Value>) -> Condition {
    let mut condition = Condition::new();
    condition.insert(key.to_owned(), value.into());
    condition
}

pub async fn test_insert(store: &Store) -> anyhow::Result<()> {
    let first = store.insert(subscription("first", "hostcreate")).await?;
    let second = store.insert(subscription("second", "hostupdate")).await?;

    assert!(second > first);

    let found = store.get(second).await?.expect("second subscription");
    assert_eq!(found.subscription_id, second);
    assert_eq!(found.subscription_name, "second");
    assert_eq!(found.statistics, None);

    assert!(store.get(second + 100).await?.is_none());
    assert_eq!(store.count_by_name("first").await?, 1);
    assert_eq!(store.count_by_name("third").await?, 0);

    Ok(())
}

pub async fn test_unique_name(store: &Store) -> anyhow::Result<()> {
    store.insert(subscription("taken", "hostcreate")).await?;

    let err = store
        .insert(subscription("taken", "hostupdate"))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::UniqueViolation(name) if name == "taken"));
    assert_eq!(store.count(&Condition::new()).await?, 1);

    Ok(())
}

pub async fn test_find(store: &Store) -> anyhow::Result<()> {
    for (name, system) in [("b", "cmdb"), ("a", "job"), ("c", "cmdb"), ("d", "cmdb")] {
        let mut sub = subscription(name, "hostcreate");
        sub.system_name = system.to_owned();
        store.insert(sub).await?;
    }

    let cmdb = by("system_name", "cmdb");
    assert_eq!(store.count(&cmdb).await?, 3);

    let page = Page {
        start: 1,
        limit: 1,
        sort: "-subscription_name".to_owned(),
    };
    let found = store.find(&FindArgs::new(cmdb.clone()).page(page)).await?;
    let names: Vec<_> = found.iter().map(|s| s.subscription_name.as_str()).collect();
    assert_eq!(names, vec!["c"]);

    let page = Page {
        sort: "subscription_name".to_owned(),
        ..Page::default()
    };
    let found = store.find(&FindArgs::new(Condition::new()).page(page)).await?;
    let names: Vec<_> = found.iter().map(|s| s.subscription_name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c", "d"]);

    let found = store
        .find(&FindArgs::new(by("subscription_name", "a")).fields(vec!["subscription_name".to_owned()]))
        .await?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].subscription_name, "a");
    assert!(found[0].subscription_id > 0);
    assert_eq!(found[0].system_name, "");
    assert_eq!(found[0].callback_url, "");

    let page = Page {
        sort: "name; DROP TABLE".to_owned(),
        ..Page::default()
    };
    let err = store
        .find(&FindArgs::new(Condition::new()).page(page))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidSortField(_)));

    Ok(())
}

pub async fn test_update_delete(store: &Store) -> anyhow::Result<()> {
    let id = store.insert(subscription("before", "hostcreate")).await?;
    store.insert(subscription("other", "hostcreate")).await?;

    assert!(store.update(id, subscription("after", "hostupdate")).await?);
    let found = store.get(id).await?.expect("renamed subscription");
    assert_eq!(found.subscription_id, id);
    assert_eq!(found.subscription_name, "after");
    assert_eq!(found.subscription_form, "hostupdate");

    assert!(store.update(id, subscription("after", "hostdelete")).await?);

    let err = store
        .update(id, subscription("other", "hostcreate"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::UniqueViolation(_)));

    assert!(!store.update(id + 100, subscription("ghost", "a")).await?);

    assert!(store.delete(id).await?);
    assert!(!store.delete(id).await?);
    assert!(store.get(id).await?.is_none());

    Ok(())
}

pub async fn test_concurrency(store: &Store) -> anyhow::Result<()> {
    let futures = (0..20).map(|i| store.insert(subscription(&format!("sub-{i}"), "a")));

    let mut ids = join_all(futures)
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    ids.sort_unstable();
    ids.dedup();

    assert_eq!(ids.len(), 20);

    Ok(())
}
