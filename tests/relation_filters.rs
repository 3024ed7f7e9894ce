//! Relation filtering tests
//!
//! - to-one `is` / `is_not`, including the absent-relation case
//! - to-many quantifiers `every` / `some` / `none`, including vacuous
//!   truth on empty relations
//! - ordering applied on top of relation filters

use serde_json::json;

use siftdb::executor::{ExecutorError, QueryExecutor};
use siftdb::query::{Filter, Query, SortKey};
use siftdb::schema::{CollectionDef, FieldDef, RelationDef, Schema};
use siftdb::source::MemorySource;

// =============================================================================
// Fixture
// =============================================================================

fn schema() -> Schema {
    let mut schema = Schema::new();
    schema
        .register(
            "user",
            CollectionDef::new()
                .field("id", FieldDef::required_string())
                .field("name", FieldDef::required_string())
                .field("created_at", FieldDef::required_timestamp())
                .relation(RelationDef::to_one("profile", "profile", "user_id"))
                .relation(RelationDef::to_many("posts", "post", "author_id")),
        )
        .unwrap();
    schema
        .register(
            "profile",
            CollectionDef::new()
                .field("id", FieldDef::required_string())
                .field("description", FieldDef::required_string())
                .field("country", FieldDef::required_string())
                .field("user_id", FieldDef::required_string())
                .field("created_at", FieldDef::required_timestamp()),
        )
        .unwrap();
    schema
        .register(
            "post",
            CollectionDef::new()
                .field("id", FieldDef::required_string())
                .field("title", FieldDef::required_string())
                .field("published", FieldDef::required_bool())
                .field("author_id", FieldDef::required_string())
                .field("created_at", FieldDef::required_timestamp()),
        )
        .unwrap();
    schema
}

/// Robert and Tegan have profiles; Callum has none
fn users_with_profiles() -> MemorySource {
    let mut source = MemorySource::new();
    let robert = source.insert("user", json!({"name": "Robert"})).unwrap();
    let tegan = source.insert("user", json!({"name": "Tegan"})).unwrap();
    source.insert("user", json!({"name": "Callum"})).unwrap();
    source
        .insert(
            "profile",
            json!({
                "description": "My very cool bio.",
                "country": "Scotland",
                "user_id": robert.id,
            }),
        )
        .unwrap();
    source
        .insert(
            "profile",
            json!({
                "description": "Hello world, this is my bio.",
                "country": "Scotland",
                "user_id": tegan.id,
            }),
        )
        .unwrap();
    source
}

/// Robert and Tegan each have two posts; Callum has none
fn users_with_posts() -> MemorySource {
    let mut source = MemorySource::new();
    let robert = source.insert("user", json!({"name": "Robert"})).unwrap();
    let tegan = source.insert("user", json!({"name": "Tegan"})).unwrap();
    source.insert("user", json!({"name": "Callum"})).unwrap();
    for (title, published, author) in [
        ("My first post", true, &robert.id),
        ("My second post", false, &robert.id),
        ("Hello, world!", true, &tegan.id),
        ("My test post", false, &tegan.id),
    ] {
        source
            .insert(
                "post",
                json!({"title": title, "published": published, "author_id": author}),
            )
            .unwrap();
    }
    source
}

fn name(found: &siftdb::executor::FoundRecord) -> &str {
    found.get("name").unwrap().as_str().unwrap()
}

// =============================================================================
// To-one relations
// =============================================================================

#[test]
fn test_profile_is() {
    let schema = schema();
    let source = users_with_profiles();
    let executor = QueryExecutor::new(&schema, &source);

    let query = Query::new("user").filter(Filter::relation_is(
        "profile",
        Filter::contains("description", "cool"),
    ));

    let found = executor.find_first_or_raise(&query).unwrap();
    assert_eq!(name(&found), "Robert");
    // relations are not attached unless included
    assert!(found.included.is_empty());
}

#[test]
fn test_profile_is_not_matches_missing_profile() {
    let schema = schema();
    let source = users_with_profiles();
    let executor = QueryExecutor::new(&schema, &source);

    // both existing profiles mention "bio", so only the user without a
    // profile survives the negation
    let query = Query::new("user").filter(Filter::relation_is_not(
        "profile",
        Filter::contains("description", "bio"),
    ));

    let found = executor.find_first_or_raise(&query).unwrap();
    assert_eq!(name(&found), "Callum");
}

// =============================================================================
// To-many quantifiers
// =============================================================================

#[test]
fn test_every_prefers_first_in_retrieval_order() {
    let schema = schema();
    let source = users_with_posts();
    let executor = QueryExecutor::new(&schema, &source);

    let query = Query::new("user").filter(Filter::relation_every(
        "posts",
        Filter::contains("title", "post"),
    ));

    // Callum matches vacuously, but Robert comes first in retrieval order
    let found = executor.find_first_or_raise(&query).unwrap();
    assert_eq!(name(&found), "Robert");
}

#[test]
fn test_none_is_vacuously_true_on_empty_relation() {
    let schema = schema();
    let source = users_with_posts();
    let executor = QueryExecutor::new(&schema, &source);

    // "Post" (capital P) appears in no title; everyone qualifies and the
    // ascending name order puts Callum first
    let query = Query::new("user")
        .filter(Filter::relation_none(
            "posts",
            Filter::contains("title", "Post"),
        ))
        .order_by(SortKey::asc("name"));

    let found = executor.find_first_or_raise(&query).unwrap();
    assert_eq!(name(&found), "Callum");
}

#[test]
fn test_some_raises_when_no_related_record_matches() {
    let schema = schema();
    let source = users_with_posts();
    let executor = QueryExecutor::new(&schema, &source);

    let query = Query::new("user").filter(Filter::relation_some(
        "posts",
        Filter::eq("title", json!("foo")),
    ));

    let err = executor.find_first_or_raise(&query).unwrap_err();
    assert!(matches!(err, ExecutorError::RecordNotFound { .. }));
}

#[test]
fn test_ordering_on_top_of_some() {
    let schema = schema();
    let source = users_with_posts();
    let executor = QueryExecutor::new(&schema, &source);

    let some_post = Filter::relation_some("posts", Filter::contains("title", "post"));

    let query = Query::new("user")
        .filter(some_post.clone())
        .order_by(SortKey::asc("name"));
    let found = executor.find_first_or_raise(&query).unwrap();
    assert_eq!(name(&found), "Robert");

    let query = Query::new("user")
        .filter(some_post)
        .order_by(SortKey::desc("name"));
    let found = executor.find_first_or_raise(&query).unwrap();
    assert_eq!(name(&found), "Tegan");
}

// =============================================================================
// Nested relation filters
// =============================================================================

#[test]
fn test_relation_filter_combined_with_logical_groups() {
    let schema = schema();
    let source = users_with_posts();
    let executor = QueryExecutor::new(&schema, &source);

    // users with some unpublished post, excluding Tegan by name
    let query = Query::new("user")
        .filter(Filter::relation_some(
            "posts",
            Filter::eq("published", json!(false)),
        ))
        .filter(Filter::not(vec![Filter::eq("name", json!("Tegan"))]))
        .order_by(SortKey::asc("name"));

    let found = executor.find_first_or_raise(&query).unwrap();
    assert_eq!(name(&found), "Robert");
}
