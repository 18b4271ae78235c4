//! Integration tests for the entity store, derived finders and associations

mod common;
use common::{print_test_header, TestFixture, AUDITOR};

use member_service::domain::query::{Condition, LockMode, Order, Predicate, Query, Sort};
use member_service::{
    Association, Fetch, Member, MemberError, MemberSummary, Team, UsernameAge, UsernameOnly,
};

// ===== CRUD =====

#[test]
fn test_insert_then_find_by_id_returns_equal_member() {
    print_test_header(
        "test_insert_then_find_by_id_returns_equal_member",
        &["Inserted member is found by identity with equal fields"],
    );
    let fx = TestFixture::new();

    let saved = fx.member("memberA", 10);
    assert!(!saved.is_new());
    assert_eq!(saved.version, 1);

    let found = fx.service.find_member(saved.id).unwrap();
    assert_eq!(found, saved);
    assert_eq!(found.username, "memberA");
}

#[test]
fn test_identities_follow_insertion_order() {
    let fx = TestFixture::new();
    let a = fx.member("a", 1);
    let b = fx.member("b", 2);
    let c = fx.member("c", 3);
    assert!(a.id < b.id && b.id < c.id);

    let all = fx.service.find_all_members().unwrap();
    assert_eq!(TestFixture::usernames(&all), vec!["a", "b", "c"]);
}

#[test]
fn test_insert_rejects_persisted_member() {
    let fx = TestFixture::new();
    let saved = fx.member("memberA", 10);

    let mut copy = saved.clone();
    copy.username = "memberB".to_string();
    // save routes persisted members to update; raw insert through the
    // repository must refuse them
    let repo = fx.module.store().member_repository();
    let err = member_service::domain::Repository::insert(&repo, &copy).unwrap_err();
    assert!(matches!(
        MemberError::from(err),
        MemberError::ConstraintViolation { .. }
    ));
}

#[test]
fn test_update_bumps_version_and_keeps_creation_audit() {
    let fx = TestFixture::new();
    let saved = fx.member("memberA", 10);

    let mut changed = saved.clone();
    changed.username = "memberB".to_string();
    let updated = fx.service.save_member(&changed).unwrap();

    assert_eq!(updated.id, saved.id);
    assert_eq!(updated.version, 2);
    assert_eq!(updated.audit.created_at, saved.audit.created_at);
    assert_eq!(updated.audit.created_by.as_deref(), Some(AUDITOR));
    assert!(updated.audit.updated_at >= saved.audit.updated_at);
    assert_eq!(fx.service.find_member(saved.id).unwrap().username, "memberB");
}

#[test]
fn test_update_missing_member_is_not_found() {
    let fx = TestFixture::new();
    let mut ghost = Member::with_age("ghost", 1);
    ghost.id = 42;

    let err = fx.service.update_member(&ghost).unwrap_err();
    assert!(matches!(err, MemberError::NotFound { .. }));
}

#[test]
fn test_delete_and_counts() {
    print_test_header(
        "test_delete_and_counts",
        &["count reflects inserts and deletes; delete_all empties the table"],
    );
    let fx = TestFixture::new();
    let m1 = fx.member("member1", 10);
    fx.member("member2", 20);
    assert_eq!(fx.service.count_members().unwrap(), 2);

    fx.service.delete_member(m1.id).unwrap();
    assert_eq!(fx.service.count_members().unwrap(), 1);
    assert!(matches!(
        fx.service.find_member(m1.id).unwrap_err(),
        MemberError::NotFound { .. }
    ));
    assert!(matches!(
        fx.service.delete_member(m1.id).unwrap_err(),
        MemberError::NotFound { .. }
    ));

    assert_eq!(fx.module.store().members().len(), 1);

    assert_eq!(fx.service.delete_all_members().unwrap(), 1);
    assert_eq!(fx.service.count_members().unwrap(), 0);
    assert!(fx.module.store().members().is_empty());
}

#[test]
fn test_invalid_username_rejected() {
    let fx = TestFixture::new();
    let err = fx.service.save_member(&Member::new("  ")).unwrap_err();
    assert!(matches!(err, MemberError::ConstraintViolation { .. }));
    assert_eq!(fx.service.count_members().unwrap(), 0);
}

// ===== Derived Finds =====

#[test]
fn test_find_by_username_and_age_greater_than() {
    print_test_header(
        "test_find_by_username_and_age_greater_than",
        &["Conjunction of equality and strict greater-than"],
    );
    let fx = TestFixture::new();
    fx.member("AAA", 10);
    fx.member("AAA", 20);
    fx.member("BBB", 30);

    let found = fx
        .service
        .find_by_username_and_age_greater_than("AAA", 15)
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].username, "AAA");
    assert_eq!(found[0].age, 20);
}

#[test]
fn test_find_user_and_names() {
    let fx = TestFixture::new();
    fx.member("AAA", 10);
    fx.member("BBB", 20);
    fx.member("CCC", 30);

    let found = fx.service.find_user("AAA", 10).unwrap();
    assert_eq!(TestFixture::usernames(&found), vec!["AAA"]);
    assert!(fx.service.find_user("AAA", 11).unwrap().is_empty());

    let found = fx.service.find_by_names(["CCC", "AAA"]).unwrap();
    assert_eq!(TestFixture::usernames(&found), vec!["AAA", "CCC"]);

    assert_eq!(
        fx.service.find_username_list().unwrap(),
        vec!["AAA", "BBB", "CCC"]
    );
}

#[test]
fn test_find_by_username_like() {
    let fx = TestFixture::new();
    fx.member("member1", 10);
    fx.member("member22", 20);
    fx.member("other", 30);

    let found = fx.service.find_by_username_like("member%").unwrap();
    assert_eq!(TestFixture::usernames(&found), vec!["member1", "member22"]);

    let found = fx.service.find_by_username_like("member_").unwrap();
    assert_eq!(TestFixture::usernames(&found), vec!["member1"]);

    // regex metacharacters are literal in LIKE patterns
    assert!(fx.service.find_by_username_like("member.").unwrap().is_empty());
}

#[test]
fn test_single_result_finds() {
    print_test_header(
        "test_single_result_finds",
        &[
            "Single-result find distinguishes none, one and many",
            "Optional variant returns None when nothing matches",
        ],
    );
    let fx = TestFixture::new();
    fx.member("AAA", 10);
    fx.member("BBB", 20);
    fx.member("BBB", 30);

    assert_eq!(fx.service.find_member_by_username("AAA").unwrap().age, 10);
    assert!(matches!(
        fx.service.find_member_by_username("ZZZ").unwrap_err(),
        MemberError::NotFound { .. }
    ));
    assert!(matches!(
        fx.service.find_member_by_username("BBB").unwrap_err(),
        MemberError::ConstraintViolation { .. }
    ));

    assert!(fx.service.find_optional_by_username("ZZZ").unwrap().is_none());
    assert!(fx.service.find_optional_by_username("AAA").unwrap().is_some());
    assert!(fx.service.find_optional_by_username("BBB").is_err());
}

#[test]
fn test_top3_by_age() {
    let fx = TestFixture::new();
    for i in 1..=5 {
        fx.member(&format!("member{i}"), 10);
    }
    fx.member("older", 20);

    let found = fx.service.find_top3_by_age(10).unwrap();
    assert_eq!(
        TestFixture::usernames(&found),
        vec!["member1", "member2", "member3"]
    );
}

#[test]
fn test_query_builder_sort_and_ranges() {
    let fx = TestFixture::new();
    fx.member("b", 20);
    fx.member("a", 20);
    fx.member("c", 10);
    fx.member("d", 40);

    let query = Query::all()
        .and(Condition::ge("age", 10u32))
        .and(Condition::lt("age", 40u32))
        .sorted(Sort::by(Order::desc("age")).then(Order::asc("username")))
        .lock(LockMode::Exclusive);
    let found = fx.service.query_members(&query).unwrap();
    assert_eq!(TestFixture::usernames(&found), vec!["a", "b", "c"]);

    let older = Predicate::from(Condition::gt("age", 15u32));
    assert_eq!(fx.service.count_members_matching(&older).unwrap(), 3);
}

#[test]
fn test_unknown_field_is_constraint_violation() {
    let fx = TestFixture::new();
    fx.member("a", 1);

    let err = fx
        .service
        .query_members(&Query::filter(Condition::eq("nickname", "a")))
        .unwrap_err();
    assert!(matches!(err, MemberError::ConstraintViolation { .. }));

    let err = fx
        .service
        .query_members(&Query::all().order_by(Order::asc("nickname")))
        .unwrap_err();
    assert!(matches!(err, MemberError::ConstraintViolation { .. }));
}

#[test]
fn test_result_cache_serves_repeated_reads_until_mutation() {
    print_test_header(
        "test_result_cache_serves_repeated_reads_until_mutation",
        &["Repeated identical reads hit the cache; a write invalidates it"],
    );
    let fx = TestFixture::new();
    fx.member("member1", 10);

    let first = fx.service.find_by_username("member1").unwrap();
    let second = fx.service.find_by_username("member1").unwrap();
    assert_eq!(first, second);
    assert_eq!(fx.module.store().members().cache_hits(), 1);

    fx.member("member1", 20);
    let third = fx.service.find_by_username("member1").unwrap();
    assert_eq!(third.len(), 2);
    assert_eq!(fx.module.store().members().cache_hits(), 1);
}

// ===== Teams and Associations =====

#[test]
fn test_member_with_missing_team_rejected() {
    let fx = TestFixture::new();
    let mut member = Member::with_age("member1", 10);
    member.team_id = Some(999);

    let err = fx.service.save_member(&member).unwrap_err();
    assert!(matches!(err, MemberError::ConstraintViolation { .. }));
    assert_eq!(fx.service.count_members().unwrap(), 0);
}

#[test]
fn test_team_delete_refused_while_referenced() {
    print_test_header(
        "test_team_delete_refused_while_referenced",
        &["Deleting a team never cascades to its members"],
    );
    let fx = TestFixture::new();
    let team = fx.team("teamA");
    let member = fx.member_in("member1", 10, &team);

    let err = fx.service.delete_team(team.id).unwrap_err();
    assert!(matches!(err, MemberError::ConstraintViolation { .. }));
    assert_eq!(fx.service.count_teams().unwrap(), 1);

    fx.service.delete_member(member.id).unwrap();
    fx.service.delete_team(team.id).unwrap();
    assert_eq!(fx.service.count_teams().unwrap(), 0);
}

#[test]
fn test_change_team_and_team_members() {
    let fx = TestFixture::new();
    let (team_a, team_b, members) = fx.seed_two_teams();

    let moved = fx.service.change_team(members[0].id, team_b.id).unwrap();
    assert_eq!(moved.team_id, Some(team_b.id));
    assert_eq!(moved.version, 2);

    let a_members = fx.service.team_members(team_a.id).unwrap();
    assert_eq!(TestFixture::usernames(&a_members), vec!["member2"]);
    let b_members = fx.service.team_members(team_b.id).unwrap();
    assert_eq!(
        TestFixture::usernames(&b_members),
        vec!["member1", "member3", "member4"]
    );

    assert!(matches!(
        fx.service.team_members(999).unwrap_err(),
        MemberError::NotFound { .. }
    ));
    assert!(fx.service.change_team(members[0].id, 999).is_err());
}

#[test]
fn test_change_team_keeps_concurrent_writes() {
    print_test_header(
        "test_change_team_keeps_concurrent_writes",
        &["Changing team rewrites the stored row, not the caller's old copy"],
    );
    let fx = TestFixture::new();
    let (_team_a, team_b, members) = fx.seed_two_teams();
    let held = members[0].clone();

    fx.service.bulk_age_plus(0).unwrap();
    let moved = fx.service.change_team(held.id, team_b.id).unwrap();
    assert_eq!(moved.age, held.age + 1);
    assert_eq!(moved.team_id, Some(team_b.id));
    assert_eq!(moved.version, held.version + 2);

    assert!(matches!(
        fx.service.change_team(999, team_b.id).unwrap_err(),
        MemberError::NotFound { .. }
    ));
}

#[test]
fn test_fetch_lazy_and_join() {
    print_test_header(
        "test_fetch_lazy_and_join",
        &[
            "Lazy fetch leaves a deferred handle that load_team resolves",
            "Join fetch resolves the team in the same read",
        ],
    );
    let fx = TestFixture::new();
    let (team_a, _team_b, _members) = fx.seed_two_teams();
    fx.member("loner", 50);

    let lazy = fx.service.find_members_with_team(Fetch::Lazy).unwrap();
    assert_eq!(lazy.len(), 5);
    assert_eq!(lazy[0].team, Association::Deferred(team_a.id));
    assert_eq!(lazy[4].team, Association::Absent);
    assert_eq!(
        fx.service.load_team(&lazy[0].member).unwrap(),
        Some(team_a.clone())
    );
    assert_eq!(fx.service.load_team(&lazy[4].member).unwrap(), None);

    let joined = fx.service.find_members_with_team(Fetch::Join).unwrap();
    let names: Vec<Option<&str>> = joined
        .iter()
        .map(|g| g.team.loaded().map(|t| t.name.as_str()))
        .collect();
    assert_eq!(
        names,
        vec![Some("teamA"), Some("teamA"), Some("teamB"), Some("teamB"), None]
    );

    let graph = fx.service.find_entity_graph_by_username("member3").unwrap();
    assert_eq!(graph.len(), 1);
    assert_eq!(graph[0].team.loaded().map(|t| t.name.as_str()), Some("teamB"));
}

// ===== Projections =====

#[test]
fn test_projections() {
    let fx = TestFixture::new();
    let (_team_a, _team_b, _members) = fx.seed_two_teams();
    fx.member("loner", 50);

    let names: Vec<UsernameOnly> = fx.service.find_projections_by_username("member1").unwrap();
    assert_eq!(
        names,
        vec![UsernameOnly {
            username: "member1".to_string()
        }]
    );

    let ages: Vec<UsernameAge> = fx.service.find_projections_by_username("member2").unwrap();
    assert_eq!(ages[0].age, 20);

    let summaries: Vec<MemberSummary> =
        fx.service.find_projections_by_username("loner").unwrap();
    assert_eq!(summaries[0].team_name, None);

    // inner join drops members without a team
    let joined = fx.service.find_member_summaries().unwrap();
    assert_eq!(joined.len(), 4);
    assert_eq!(joined[0].team_name.as_deref(), Some("teamA"));
    assert_eq!(joined[3].team_name.as_deref(), Some("teamB"));
}

// ===== Auditing =====

#[test]
fn test_auditing_stamps_insert_and_update() {
    print_test_header(
        "test_auditing_stamps_insert_and_update",
        &["Creation columns are set once; modification columns track writes"],
    );
    let fx = TestFixture::new();
    let team = fx.service.save_team(&Team::new("teamA")).unwrap();
    assert_eq!(team.audit.created_by.as_deref(), Some(AUDITOR));
    assert_eq!(team.audit.created_at, team.audit.updated_at);

    let saved = fx.member("member1", 10);
    assert!(saved.audit.created_at.is_some());
    assert_eq!(saved.audit.last_modified_by.as_deref(), Some(AUDITOR));

    let mut changed = saved.clone();
    changed.audit = Default::default();
    let updated = fx.service.save_member(&changed).unwrap();
    assert_eq!(updated.audit.created_at, saved.audit.created_at);
    assert_eq!(updated.audit.created_by, saved.audit.created_by);
    assert!(updated.audit.updated_at.is_some());
}

#[test]
fn test_random_auditor_by_default() {
    let fx = TestFixture::with_config(member_service::Config::default());
    let saved = fx.member("member1", 10);
    let who = saved.audit.created_by.unwrap_or_default();
    assert_eq!(who.len(), 36);
}
