//! Common test utilities and shared fixtures
#![allow(dead_code)]

use member_service::config::{AuditorConfig, Config};
use member_service::domain::Service;
use member_service::{Member, MemberServiceModule, Team};
use std::sync::Arc;

/// Auditor name stamped on every write made through a fixture
pub const AUDITOR: &str = "tester";

/// A fresh module with a fixed auditor
pub struct TestFixture {
    pub module: MemberServiceModule,
    pub service: Arc<Service>,
}

impl TestFixture {
    pub fn new() -> Self {
        Self::with_config(Config {
            auditor: AuditorConfig::Fixed(AUDITOR.to_string()),
            ..Config::default()
        })
    }

    pub fn with_config(config: Config) -> Self {
        let module = MemberServiceModule::new(config);
        let service = module.service();
        Self { module, service }
    }

    pub fn team(&self, name: &str) -> Team {
        self.service.save_team(&Team::new(name)).unwrap()
    }

    pub fn member(&self, username: &str, age: u32) -> Member {
        self.service
            .save_member(&Member::with_age(username, age))
            .unwrap()
    }

    pub fn member_in(&self, username: &str, age: u32, team: &Team) -> Member {
        self.service
            .save_member(&Member::with_team(username, age, team))
            .unwrap()
    }

    /// teamA, teamB and member1..member4 split between them
    pub fn seed_two_teams(&self) -> (Team, Team, Vec<Member>) {
        let team_a = self.team("teamA");
        let team_b = self.team("teamB");
        let members = vec![
            self.member_in("member1", 10, &team_a),
            self.member_in("member2", 20, &team_a),
            self.member_in("member3", 30, &team_b),
            self.member_in("member4", 40, &team_b),
        ];
        (team_a, team_b, members)
    }

    /// Usernames in the order given
    pub fn usernames(members: &[Member]) -> Vec<&str> {
        members.iter().map(|m| m.username.as_str()).collect()
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

pub fn print_test_header(test_name: &str, purpose: &[&str]) {
    println!("\n🧪 TEST: {}", test_name);
    if let Some(first) = purpose.first() {
        println!("📋 PURPOSE: {}", first);
    }
    for line in purpose.iter().skip(1) {
        println!("   {}", line);
    }
}

/// Mock repository implementations for testing
pub mod mocks {
    use member_service::domain::query::{Predicate, Query};
    use member_service::domain::repository::{Repository, StoreError};
    use member_service::Member;
    use parking_lot::RwLock;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Member repository whose backing store cannot be reached
    #[derive(Default)]
    pub struct UnreachableMemberRepo {
        calls: AtomicU64,
    }

    impl UnreachableMemberRepo {
        pub fn calls(&self) -> u64 {
            self.calls.load(Ordering::Relaxed)
        }

        fn fail<T>(&self) -> Result<T, StoreError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
    }

    impl Repository<Member> for UnreachableMemberRepo {
        fn insert(&self, _member: &Member) -> Result<Member, StoreError> {
            self.fail()
        }

        fn update(&self, _member: &Member) -> Result<Member, StoreError> {
            self.fail()
        }

        fn find_by_id(&self, _id: u64) -> Result<Option<Member>, StoreError> {
            self.fail()
        }

        fn find_all(&self, _query: &Query) -> Result<Vec<Member>, StoreError> {
            self.fail()
        }

        fn count(&self, _predicate: &Predicate) -> Result<u64, StoreError> {
            self.fail()
        }

        fn delete(&self, _id: u64) -> Result<Member, StoreError> {
            self.fail()
        }

        fn delete_all(&self) -> Result<usize, StoreError> {
            self.fail()
        }

        fn bulk_update(
            &self,
            _predicate: &Predicate,
            _transform: &dyn Fn(&mut Member),
        ) -> Result<usize, StoreError> {
            self.fail()
        }
    }

    /// Member repository recording every query it receives
    pub struct RecordingMemberRepo<R> {
        pub inner: R,
        pub queries: RwLock<Vec<Query>>,
    }

    impl<R> RecordingMemberRepo<R> {
        pub fn new(inner: R) -> Self {
            Self {
                inner,
                queries: RwLock::new(Vec::new()),
            }
        }

        pub fn recorded(&self) -> Vec<Query> {
            self.queries.read().clone()
        }
    }

    impl<R: Repository<Member>> Repository<Member> for RecordingMemberRepo<R> {
        fn insert(&self, member: &Member) -> Result<Member, StoreError> {
            self.inner.insert(member)
        }

        fn update(&self, member: &Member) -> Result<Member, StoreError> {
            self.inner.update(member)
        }

        fn find_by_id(&self, id: u64) -> Result<Option<Member>, StoreError> {
            self.inner.find_by_id(id)
        }

        fn find_all(&self, query: &Query) -> Result<Vec<Member>, StoreError> {
            self.queries.write().push(query.clone());
            self.inner.find_all(query)
        }

        fn count(&self, predicate: &Predicate) -> Result<u64, StoreError> {
            self.inner.count(predicate)
        }

        fn delete(&self, id: u64) -> Result<Member, StoreError> {
            self.inner.delete(id)
        }

        fn delete_all(&self) -> Result<usize, StoreError> {
            self.inner.delete_all()
        }

        fn bulk_update(
            &self,
            predicate: &Predicate,
            transform: &dyn Fn(&mut Member),
        ) -> Result<usize, StoreError> {
            self.inner.bulk_update(predicate, transform)
        }
    }
}
