use tahkiye_core::db::open_db_in_memory;
use tahkiye_core::{
    CategoryRepository, SqliteCategoryRepository, SqliteTagRepository, SqliteTopicRepository,
    TagKind, TagRepository, TimelineService, Topic, TopicRepository, TopicService,
    TopicServiceError,
};

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn create_topic_derives_slug_and_reads_back() {
    let conn = open_db_in_memory().unwrap();
    let service = TopicService::new(SqliteTopicRepository::new(&conn));

    let created = service
        .create_topic("İstanbul'un Fethi", Some(1453))
        .unwrap();
    assert_eq!(created.slug, "istanbul-un-fethi");
    assert_eq!(created.year_override, Some(1453));
    assert_eq!(created.view_count, 0);

    let by_slug = service.get_topic_by_slug("istanbul-un-fethi").unwrap();
    assert_eq!(by_slug.map(|topic| topic.id), Some(created.id));
    let by_title = service.get_topic_by_slug("İstanbul'un Fethi").unwrap();
    assert_eq!(by_title.map(|topic| topic.id), Some(created.id));
}

#[test]
fn duplicate_slug_is_rejected_on_admin_create() {
    let conn = open_db_in_memory().unwrap();
    let service = TopicService::new(SqliteTopicRepository::new(&conn));
    service.create_topic("Lale Devri", None).unwrap();

    let err = service.create_topic("  lale   DEVRİ ", None).unwrap_err();
    assert!(matches!(err, TopicServiceError::DuplicateSlug(slug) if slug == "lale-devri"));
}

#[test]
fn repository_maps_unique_violation_to_duplicate_slug() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTopicRepository::new(&conn);
    repo.create_topic(&Topic::new("Tanzimat")).unwrap();

    let err = repo.create_topic(&Topic::new("tanzimat")).unwrap_err();
    assert!(matches!(err, tahkiye_core::RepoError::DuplicateSlug(_)));
}

#[test]
fn blank_title_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = TopicService::new(SqliteTopicRepository::new(&conn));
    let err = service.create_topic("   ", None).unwrap_err();
    assert!(matches!(err, TopicServiceError::Invalid(_)));
}

#[test]
fn set_tags_normalizes_and_replaces_per_kind() {
    let conn = open_db_in_memory().unwrap();
    let service = TopicService::new(SqliteTopicRepository::new(&conn));
    let topic = service.create_topic("Lale Devri", None).unwrap();

    service
        .set_tags(topic.id, TagKind::General, names(&["Osmanlı", "osmanli", " Sanat "]))
        .unwrap();
    let after_date = service
        .set_tags(topic.id, TagKind::Date, names(&["18. Yüzyıl"]))
        .unwrap();

    let general: Vec<&str> = after_date
        .tags_of(TagKind::General)
        .map(|tag| tag.name.as_str())
        .collect();
    assert_eq!(general, vec!["Osmanlı", "Sanat"]);
    let date: Vec<&str> = after_date
        .tags_of(TagKind::Date)
        .map(|tag| tag.slug.as_str())
        .collect();
    assert_eq!(date, vec!["1700"]);

    let replaced = service
        .set_tags(topic.id, TagKind::Date, names(&["1718"]))
        .unwrap();
    assert_eq!(replaced.tags_of(TagKind::General).count(), 2);
    let date: Vec<&str> = replaced
        .tags_of(TagKind::Date)
        .map(|tag| tag.name.as_str())
        .collect();
    assert_eq!(date, vec!["1718"]);
}

#[test]
fn set_tags_rejects_blank_and_punctuation_names() {
    let conn = open_db_in_memory().unwrap();
    let service = TopicService::new(SqliteTopicRepository::new(&conn));
    let topic = service.create_topic("Nutuk", None).unwrap();

    let err = service
        .set_tags(topic.id, TagKind::General, names(&["Tarih", "   "]))
        .unwrap_err();
    assert!(matches!(err, TopicServiceError::InvalidTag(_)));

    let err = service
        .set_tags(topic.id, TagKind::General, names(&["..."]))
        .unwrap_err();
    assert!(matches!(err, TopicServiceError::InvalidTag(value) if value == "..."));

    let unchanged = service.get_topic(topic.id).unwrap().unwrap();
    assert!(unchanged.tags.is_empty());
}

#[test]
fn same_slug_may_exist_once_per_kind() {
    let conn = open_db_in_memory().unwrap();
    let tags = SqliteTagRepository::new(&conn);

    let general = tags.ensure_tag("1923", TagKind::General).unwrap();
    let date = tags.ensure_tag("1923", TagKind::Date).unwrap();
    let again = tags.ensure_tag(" 1923 ", TagKind::Date).unwrap();

    assert_ne!(general.id, date.id);
    assert_eq!(date.id, again.id);
    assert_eq!(tags.list_tags(None).unwrap().len(), 2);
    assert_eq!(tags.list_tags(Some(TagKind::Date)).unwrap().len(), 1);
    assert_eq!(
        tags.get_tag_by_slug("1923", TagKind::General).unwrap(),
        Some(general)
    );
}

#[test]
fn date_tags_spelled_alike_keep_their_own_years() {
    let conn = open_db_in_memory().unwrap();
    let service = TopicService::new(SqliteTopicRepository::new(&conn));
    let roma = service.create_topic("Roma", None).unwrap();
    let herodot = service.create_topic("Herodot", None).unwrap();
    let kleisthenes = service.create_topic("Kleisthenes", None).unwrap();
    let perikles = service.create_topic("Perikles", None).unwrap();
    service
        .set_tags(roma.id, TagKind::Date, names(&["MO 450"]))
        .unwrap();
    service
        .set_tags(herodot.id, TagKind::Date, names(&["MÖ 450"]))
        .unwrap();
    service
        .set_tags(kleisthenes.id, TagKind::Date, names(&["M.O. 5. yy"]))
        .unwrap();
    service
        .set_tags(perikles.id, TagKind::Date, names(&["M.Ö. 5. yy"]))
        .unwrap();

    let timeline = TimelineService::new(SqliteTopicRepository::new(&conn)).timeline();
    let mut years: Vec<(&str, i64)> = timeline
        .buckets
        .iter()
        .flat_map(|bucket| bucket.cards.iter())
        .map(|card| (card.title.as_str(), card.year))
        .collect();
    years.sort();
    assert_eq!(
        years,
        vec![
            ("Herodot", -450),
            ("Kleisthenes", 400),
            ("Perikles", -400),
            ("Roma", 450),
        ]
    );

    let tags = SqliteTagRepository::new(&conn);
    assert_eq!(tags.list_tags(Some(TagKind::Date)).unwrap().len(), 4);
    let bce = tags.get_tag_by_slug("mo-450", TagKind::Date).unwrap().unwrap();
    assert_eq!(bce.name, "MÖ 450");
}

#[test]
fn date_tags_with_the_same_year_share_one_tag() {
    let conn = open_db_in_memory().unwrap();
    let tags = SqliteTagRepository::new(&conn);

    let first = tags.ensure_tag("M.Ö. 450", TagKind::Date).unwrap();
    let second = tags.ensure_tag("MÖ 450", TagKind::Date).unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(second.name, "M.Ö. 450");
    assert_eq!(second.slug, "mo-450");

    let century = tags.ensure_tag("18. Yüzyıl", TagKind::Date).unwrap();
    assert_eq!(century.slug, "1700");
}

#[test]
fn tag_usage_counts_topics() {
    let conn = open_db_in_memory().unwrap();
    let service = TopicService::new(SqliteTopicRepository::new(&conn));
    let first = service.create_topic("Birinci", None).unwrap();
    let second = service.create_topic("İkinci", None).unwrap();
    service
        .set_tags(first.id, TagKind::General, names(&["Tarih", "Edebiyat"]))
        .unwrap();
    service
        .set_tags(second.id, TagKind::General, names(&["Tarih"]))
        .unwrap();

    let usage = SqliteTagRepository::new(&conn)
        .list_tag_usage(TagKind::General)
        .unwrap();
    let counts: Vec<(&str, u64)> = usage
        .iter()
        .map(|item| (item.tag.slug.as_str(), item.topic_count))
        .collect();
    assert_eq!(counts, vec![("tarih", 2), ("edebiyat", 1)]);
}

#[test]
fn categories_are_unique_and_assignable() {
    let conn = open_db_in_memory().unwrap();
    let categories = SqliteCategoryRepository::new(&conn);
    categories.create_category("Tarih").unwrap();
    categories.create_category("Edebiyat").unwrap();
    let err = categories.create_category("TARİH").unwrap_err();
    assert!(matches!(err, tahkiye_core::RepoError::DuplicateSlug(slug) if slug == "tarih"));

    let service = TopicService::new(SqliteTopicRepository::new(&conn));
    let topic = service.create_topic("Divan Edebiyatı", None).unwrap();
    let updated = service
        .set_categories(topic.id, names(&["Edebiyat", "tarih", "edebiyat"]))
        .unwrap();
    let slugs: Vec<&str> = updated
        .categories
        .iter()
        .map(|category| category.slug.as_str())
        .collect();
    assert_eq!(slugs, vec!["edebiyat", "tarih"]);

    let err = service
        .set_categories(topic.id, names(&["felsefe"]))
        .unwrap_err();
    assert!(matches!(err, TopicServiceError::CategoryNotFound(slug) if slug == "felsefe"));
    let unchanged = service.get_topic(topic.id).unwrap().unwrap();
    assert_eq!(unchanged.categories.len(), 2);
}

#[test]
fn list_topics_filters_by_tag_and_category() {
    let conn = open_db_in_memory().unwrap();
    SqliteCategoryRepository::new(&conn)
        .create_category("Tarih")
        .unwrap();
    let service = TopicService::new(SqliteTopicRepository::new(&conn));
    let tagged = service.create_topic("Malazgirt", Some(1071)).unwrap();
    let categorized = service.create_topic("Kadeş", None).unwrap();
    service.create_topic("Serbest", None).unwrap();
    service
        .set_tags(tagged.id, TagKind::General, names(&["Selçuklu"]))
        .unwrap();
    service
        .set_categories(categorized.id, names(&["tarih"]))
        .unwrap();

    let by_tag = service.list_topics(Some("Selçuklu"), None, None, 0).unwrap();
    assert_eq!(by_tag.applied_limit, 20);
    assert_eq!(by_tag.items.len(), 1);
    assert_eq!(by_tag.items[0].id, tagged.id);

    let by_category = service.list_topics(None, Some("tarih"), Some(500), 0).unwrap();
    assert_eq!(by_category.applied_limit, 100);
    assert_eq!(by_category.items.len(), 1);
    assert_eq!(by_category.items[0].id, categorized.id);

    let all = service.list_topics(None, None, Some(2), 0).unwrap();
    assert_eq!(all.items.len(), 2);
    let rest = service.list_topics(None, None, Some(2), 2).unwrap();
    assert_eq!(rest.items.len(), 1);
}

#[test]
fn year_override_can_be_set_and_cleared() {
    let conn = open_db_in_memory().unwrap();
    let service = TopicService::new(SqliteTopicRepository::new(&conn));
    let topic = service.create_topic("Kadeş Antlaşması", None).unwrap();

    let set = service.set_year_override(topic.id, Some(-1259)).unwrap();
    assert_eq!(set.year_override, Some(-1259));
    let cleared = service.set_year_override(topic.id, None).unwrap();
    assert_eq!(cleared.year_override, None);

    let missing = service.set_year_override(uuid::Uuid::new_v4(), Some(1)).unwrap_err();
    assert!(matches!(missing, TopicServiceError::TopicNotFound(_)));
}

#[test]
fn record_view_increments_by_one() {
    let conn = open_db_in_memory().unwrap();
    let service = TopicService::new(SqliteTopicRepository::new(&conn));
    let topic = service.create_topic("Sayaç", None).unwrap();

    assert_eq!(service.record_view(topic.id).unwrap(), 1);
    assert_eq!(service.record_view(topic.id).unwrap(), 2);
    assert_eq!(service.get_topic(topic.id).unwrap().unwrap().view_count, 2);
}
