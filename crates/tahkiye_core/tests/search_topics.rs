use tahkiye_core::db::open_db_in_memory;
use tahkiye_core::{
    search_topics, EntryService, HitSource, SearchError, SearchQuery, SqliteEntryRepository,
    SqliteTopicRepository, TopicService,
};

#[test]
fn title_match_returns_topic() {
    let conn = open_db_in_memory().unwrap();
    let topics = TopicService::new(SqliteTopicRepository::new(&conn));
    let topic = topics.create_topic("Malazgirt Meydan Muharebesi", Some(1071)).unwrap();
    topics.create_topic("Lale Devri", None).unwrap();

    let hits = search_topics(&conn, &SearchQuery::new("malazgirt")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].topic_id, topic.id);
    assert_eq!(hits[0].slug, "malazgirt-meydan-muharebesi");
    assert_eq!(hits[0].source, HitSource::Title);
    assert!(hits[0].snippet.contains("[Malazgirt]"));
}

#[test]
fn entry_matches_are_grouped_per_topic() {
    let conn = open_db_in_memory().unwrap();
    let entries = EntryService::new(
        SqliteTopicRepository::new(&conn),
        SqliteEntryRepository::new(&conn),
    );
    let first = entries
        .submit_entry("Lale Devri", "ayse", "sadabad köşkü ve lale bahçeleri")
        .unwrap();
    entries
        .submit_entry("Lale Devri", "mehmet", "sadabad eğlenceleri")
        .unwrap();
    entries
        .submit_entry("Tanzimat", "zeynep", "gülhane hattı okundu")
        .unwrap();

    let hits = search_topics(&conn, &SearchQuery::new("sadabad")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].topic_id, first.topic.id);
    assert_eq!(hits[0].source, HitSource::Entry);
}

#[test]
fn renamed_topic_is_searchable_by_new_title_only() {
    let conn = open_db_in_memory().unwrap();
    let topics = TopicService::new(SqliteTopicRepository::new(&conn));
    let topic = topics.create_topic("Eski Başlık", None).unwrap();
    conn.execute(
        "UPDATE topics SET title = 'Yeni Başlık' WHERE uuid = ?1;",
        [topic.id.to_string()],
    )
    .unwrap();

    assert!(search_topics(&conn, &SearchQuery::new("eski")).unwrap().is_empty());
    assert_eq!(search_topics(&conn, &SearchQuery::new("yeni")).unwrap().len(), 1);
}

#[test]
fn blank_query_and_zero_limit_return_nothing() {
    let conn = open_db_in_memory().unwrap();
    TopicService::new(SqliteTopicRepository::new(&conn))
        .create_topic("Nutuk", Some(1927))
        .unwrap();

    assert!(search_topics(&conn, &SearchQuery::new("   ")).unwrap().is_empty());
    let mut query = SearchQuery::new("nutuk");
    query.limit = 0;
    assert!(search_topics(&conn, &query).unwrap().is_empty());
}

#[test]
fn limit_caps_distinct_topics() {
    let conn = open_db_in_memory().unwrap();
    let topics = TopicService::new(SqliteTopicRepository::new(&conn));
    for title in ["Savaş Bir", "Savaş İki", "Savaş Üç"] {
        topics.create_topic(title, None).unwrap();
    }

    let mut query = SearchQuery::new("savaş");
    query.limit = 2;
    assert_eq!(search_topics(&conn, &query).unwrap().len(), 2);
}

#[test]
fn quotes_in_plain_mode_are_escaped() {
    let conn = open_db_in_memory().unwrap();
    TopicService::new(SqliteTopicRepository::new(&conn))
        .create_topic("Nutuk", None)
        .unwrap();

    let hits = search_topics(&conn, &SearchQuery::new("\"nutuk")).unwrap();
    assert_eq!(hits.len(), 1);
}

#[test]
fn raw_mode_reports_syntax_errors() {
    let conn = open_db_in_memory().unwrap();
    let mut query = SearchQuery::new("\"unterminated");
    query.raw_fts_syntax = true;

    let err = search_topics(&conn, &query).unwrap_err();
    assert!(matches!(err, SearchError::InvalidQuery { .. }));
}
