use crate::config::{SortOrder, StoreConfig};
use crate::types::{Comment, Policy, PolicyDraft, VoteDirection};
use chrono::{Local, Utc};

/// Observer callback invoked with a read-only snapshot after every mutation
type Observer = Box<dyn Fn(&[Policy])>;

/// Mutating operations on the catalog. Only a subset of them can change a
/// sort key; the others intentionally leave the stored order untouched
/// (comment timestamps are not a sort key).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mutation {
    Seed,
    AddPolicy,
    Vote,
    Resort,
    AddComment,
    VoteComment,
}

impl Mutation {
    fn affects_sort(self) -> bool {
        matches!(
            self,
            Mutation::Seed | Mutation::AddPolicy | Mutation::Vote | Mutation::Resort
        )
    }
}

/// In-memory policy catalog with voting, commenting and derived ordering.
///
/// The store owns its state and notifies subscribed observers after each
/// mutation; it assumes a single logical caller and last-write-wins
/// semantics. Callers in a concurrent setting must serialize access
/// externally.
pub struct PolicyStore {
    config: StoreConfig,
    policies: Vec<Policy>,
    sort_order: SortOrder,
    seeded: bool,
    id_seq: u64,
    observers: Vec<Observer>,
}

impl PolicyStore {
    /// Create an empty store with the given configuration
    pub fn new(config: StoreConfig) -> Self {
        let sort_order = config.sort_order;
        Self {
            config,
            policies: Vec::new(),
            sort_order,
            seeded: false,
            id_seq: 0,
            observers: Vec::new(),
        }
    }

    /// Seed the catalog from static fixture data. Runs only while the
    /// catalog is empty and at most once per store lifetime.
    pub fn initialize(&mut self, seed: Vec<Policy>) {
        if self.seeded || !self.policies.is_empty() {
            return;
        }
        self.seeded = true;
        self.policies = seed;
        self.finish_mutation(Mutation::Seed);
    }

    /// Current catalog in stored (sorted) order
    pub fn policies(&self) -> &[Policy] {
        &self.policies
    }

    /// Active sort order
    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    /// Register an observer called with a snapshot after every mutation
    pub fn subscribe(&mut self, observer: impl Fn(&[Policy]) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Add a new policy from caller-supplied fields.
    ///
    /// Assigns a fresh identifier, trims `problems` entries (dropping ones
    /// that are empty after trimming; the other list fields are expected
    /// pre-normalized by the caller) and re-sorts the catalog. Returns the
    /// identifier of the new policy.
    pub fn add_policy(&mut self, draft: PolicyDraft) -> String {
        let id = self.next_id("policy");
        let problems = draft
            .problems
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        self.policies.push(Policy {
            id: id.clone(),
            title: draft.title,
            purpose: draft.purpose,
            overview: draft.overview,
            detailed_plan: draft.detailed_plan,
            problems,
            benefits: draft.benefits,
            drawbacks: draft.drawbacks,
            keywords: draft.keywords,
            related_events: draft.related_events,
            year: draft.year,
            budget: draft.budget,
            status: draft.status,
            upvotes: 0,
            downvotes: 0,
            comments: Vec::new(),
        });
        self.finish_mutation(Mutation::AddPolicy);
        id
    }

    /// Record an up/down vote on a policy. Unmatched identifiers are
    /// silently ignored.
    pub fn vote(&mut self, policy_id: &str, direction: VoteDirection) {
        let Some(policy) = self.policies.iter_mut().find(|p| p.id == policy_id) else {
            return;
        };
        match direction {
            VoteDirection::Up => policy.upvotes += 1,
            VoteDirection::Down => policy.downvotes += 1,
        }
        self.finish_mutation(Mutation::Vote);
    }

    /// Append a comment to a policy. Whitespace-only text and unmatched
    /// identifiers are silently ignored. Does not re-sort the catalog.
    pub fn add_comment(&mut self, policy_id: &str, text: &str, anonymous: bool) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        let id = self.next_id("comment");
        let author = if anonymous {
            self.config.anonymous_label.clone()
        } else {
            self.config.citizen_label.clone()
        };
        let Some(policy) = self.policies.iter_mut().find(|p| p.id == policy_id) else {
            return;
        };
        policy.comments.push(Comment {
            id,
            author,
            text: trimmed.to_string(),
            created_at: Local::now().format("%Y/%m/%d %H:%M").to_string(),
            upvotes: 0,
            downvotes: 0,
        });
        self.finish_mutation(Mutation::AddComment);
    }

    /// Record an up/down vote on a comment. No-op unless both identifiers
    /// match. Does not affect policy-level ordering.
    pub fn vote_comment(&mut self, policy_id: &str, comment_id: &str, direction: VoteDirection) {
        let Some(comment) = self
            .policies
            .iter_mut()
            .find(|p| p.id == policy_id)
            .and_then(|p| p.comments.iter_mut().find(|c| c.id == comment_id))
        else {
            return;
        };
        match direction {
            VoteDirection::Up => comment.upvotes += 1,
            VoteDirection::Down => comment.downvotes += 1,
        }
        self.finish_mutation(Mutation::VoteComment);
    }

    /// Change the active sort order and re-sort immediately
    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.sort_order = order;
        self.finish_mutation(Mutation::Resort);
    }

    /// Case-insensitive substring filter over title, purpose, overview,
    /// detailed plan, problems, keywords and related events. Only the empty
    /// term is special-cased (matches everything); whitespace in the term
    /// is significant. Pure projection; stored order is untouched.
    pub fn filtered(&self, term: &str) -> Vec<&Policy> {
        let needle = term.to_lowercase();
        if needle.is_empty() {
            return self.policies.iter().collect();
        }
        self.policies
            .iter()
            .filter(|p| Self::matches_term(p, &needle))
            .collect()
    }

    fn matches_term(policy: &Policy, needle: &str) -> bool {
        let haystacks = [
            &policy.title,
            &policy.purpose,
            &policy.overview,
            &policy.detailed_plan,
        ];
        if haystacks.iter().any(|h| h.to_lowercase().contains(needle)) {
            return true;
        }
        policy
            .problems
            .iter()
            .chain(policy.keywords.iter())
            .chain(policy.related_events.iter())
            .any(|entry| entry.to_lowercase().contains(needle))
    }

    /// Generate a fresh identifier. The millisecond timestamp keeps ids
    /// readable; the sequence number guarantees uniqueness under rapid
    /// successive calls.
    fn next_id(&mut self, prefix: &str) -> String {
        self.id_seq += 1;
        format!("{}-{}-{}", prefix, Utc::now().timestamp_millis(), self.id_seq)
    }

    fn finish_mutation(&mut self, mutation: Mutation) {
        if mutation.affects_sort() {
            self.resort();
        }
        for observer in &self.observers {
            observer(&self.policies);
        }
    }

    /// Stable sort under the active order. Popularity scores use sentinel
    /// values for unvoted policies: -1.0 descending and +2.0 ascending, so
    /// unvoted policies land last in both popularity modes.
    fn resort(&mut self) {
        match self.sort_order {
            SortOrder::Newest => self
                .policies
                .sort_by(|a, b| b.year.unwrap_or(0).cmp(&a.year.unwrap_or(0))),
            SortOrder::PopularityDesc => self.policies.sort_by(|a, b| {
                popularity_score(b, -1.0).total_cmp(&popularity_score(a, -1.0))
            }),
            SortOrder::PopularityAsc => self.policies.sort_by(|a, b| {
                popularity_score(a, 2.0).total_cmp(&popularity_score(b, 2.0))
            }),
        }
    }
}

impl Default for PolicyStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

/// Approval ratio in [0, 1], or the given sentinel when no votes exist
fn popularity_score(policy: &Policy, unvoted: f64) -> f64 {
    let total = policy.upvotes + policy.downvotes;
    if total == 0 {
        unvoted
    } else {
        policy.upvotes as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, year: Option<i32>) -> PolicyDraft {
        PolicyDraft {
            title: title.to_string(),
            purpose: String::new(),
            overview: String::new(),
            detailed_plan: String::new(),
            problems: vec![],
            benefits: vec![],
            drawbacks: vec![],
            keywords: vec![],
            related_events: vec![],
            year,
            budget: None,
            status: None,
        }
    }

    fn seeded_store() -> PolicyStore {
        let mut store = PolicyStore::default();
        let a = draft("公園整備", Some(2024));
        let b = draft("図書館改修", Some(2023));
        store.add_policy(a);
        store.add_policy(b);
        store
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let mut store = PolicyStore::default();
        let seed = vec![Policy {
            id: "seed-1".to_string(),
            title: "test".to_string(),
            purpose: String::new(),
            overview: String::new(),
            detailed_plan: String::new(),
            problems: vec![],
            benefits: vec![],
            drawbacks: vec![],
            keywords: vec![],
            related_events: vec![],
            year: Some(2024),
            budget: None,
            status: None,
            upvotes: 0,
            downvotes: 0,
            comments: vec![],
        }];
        store.initialize(seed.clone());
        assert_eq!(store.policies().len(), 1);
        // Second call is a no-op
        store.initialize(seed);
        assert_eq!(store.policies().len(), 1);
    }

    #[test]
    fn test_add_policy_assigns_distinct_ids() {
        let mut store = PolicyStore::default();
        let first = store.add_policy(draft("a", Some(2024)));
        let second = store.add_policy(draft("b", Some(2024)));
        assert_eq!(store.policies().len(), 2);
        assert_ne!(first, second);
    }

    #[test]
    fn test_add_policy_normalizes_problems_only() {
        let mut store = PolicyStore::default();
        let mut d = draft("a", Some(2024));
        d.problems = vec!["  騒音  ".to_string(), "   ".to_string()];
        d.keywords = vec!["  環境  ".to_string()];
        let id = store.add_policy(d);
        let policy = store.policies().iter().find(|p| p.id == id).unwrap();
        assert_eq!(policy.problems, vec!["騒音"]);
        // Keywords are expected pre-normalized and pass through untouched
        assert_eq!(policy.keywords, vec!["  環境  "]);
    }

    #[test]
    fn test_vote_increments_exactly_one_policy() {
        let mut store = seeded_store();
        let target = store.policies()[0].id.clone();
        let other = store.policies()[1].id.clone();
        store.vote(&target, VoteDirection::Up);
        store.vote(&target, VoteDirection::Down);
        let target_policy = store.policies().iter().find(|p| p.id == target).unwrap();
        let other_policy = store.policies().iter().find(|p| p.id == other).unwrap();
        assert_eq!(target_policy.upvotes, 1);
        assert_eq!(target_policy.downvotes, 1);
        assert_eq!(other_policy.upvotes, 0);
        assert_eq!(other_policy.downvotes, 0);
    }

    #[test]
    fn test_vote_unknown_id_is_noop() {
        let mut store = seeded_store();
        store.vote("no-such-policy", VoteDirection::Up);
        assert!(store.policies().iter().all(|p| p.upvotes == 0));
    }

    #[test]
    fn test_popularity_undefined_without_votes() {
        let store = seeded_store();
        assert!(store.policies()[0].popularity().is_none());
    }

    #[test]
    fn test_popularity_ratio() {
        let mut store = seeded_store();
        let id = store.policies()[0].id.clone();
        for _ in 0..3 {
            store.vote(&id, VoteDirection::Up);
        }
        store.vote(&id, VoteDirection::Down);
        let policy = store.policies().iter().find(|p| p.id == id).unwrap();
        let percent = policy.popularity().unwrap();
        assert!((percent - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_whitespace_comment_is_noop() {
        let mut store = seeded_store();
        let id = store.policies()[0].id.clone();
        store.add_comment(&id, "   ", true);
        let policy = store.policies().iter().find(|p| p.id == id).unwrap();
        assert!(policy.comments.is_empty());
    }

    #[test]
    fn test_comment_authors_and_order() {
        let mut store = seeded_store();
        let id = store.policies()[0].id.clone();
        store.add_comment(&id, " 賛成です ", false);
        store.add_comment(&id, "反対です", true);
        let policy = store.policies().iter().find(|p| p.id == id).unwrap();
        assert_eq!(policy.comments.len(), 2);
        assert_eq!(policy.comments[0].author, "市民");
        assert_eq!(policy.comments[0].text, "賛成です");
        assert_eq!(policy.comments[1].author, "匿名市民");
        assert_ne!(policy.comments[0].id, policy.comments[1].id);
    }

    #[test]
    fn test_vote_comment() {
        let mut store = seeded_store();
        let id = store.policies()[0].id.clone();
        store.add_comment(&id, "賛成です", false);
        let comment_id = store
            .policies()
            .iter()
            .find(|p| p.id == id)
            .unwrap()
            .comments[0]
            .id
            .clone();
        store.vote_comment(&id, &comment_id, VoteDirection::Up);
        store.vote_comment(&id, "missing", VoteDirection::Up);
        let policy = store.policies().iter().find(|p| p.id == id).unwrap();
        assert_eq!(policy.comments[0].upvotes, 1);
        assert_eq!(policy.comments[0].downvotes, 0);
    }

    #[test]
    fn test_unvoted_policies_sort_last_in_both_popularity_modes() {
        let mut store = seeded_store();
        store.add_policy(draft("unvoted", Some(2025)));
        // 1 up / 99 down: terrible ratio, still above any unvoted policy
        let low_id = store.policies().iter().find(|p| p.title == "公園整備").unwrap().id.clone();
        store.vote(&low_id, VoteDirection::Up);
        for _ in 0..99 {
            store.vote(&low_id, VoteDirection::Down);
        }
        let high_id = store.policies().iter().find(|p| p.title == "図書館改修").unwrap().id.clone();
        store.vote(&high_id, VoteDirection::Up);

        store.set_sort_order(SortOrder::PopularityDesc);
        assert_eq!(store.policies().last().unwrap().title, "unvoted");

        store.set_sort_order(SortOrder::PopularityAsc);
        assert_eq!(store.policies().last().unwrap().title, "unvoted");
    }

    #[test]
    fn test_sort_switching_scenario() {
        let mut store = PolicyStore::default();
        let newer = store.add_policy(draft("newer", Some(2024)));
        let older = store.add_policy(draft("older", Some(2023)));
        for _ in 0..10 {
            store.vote(&newer, VoteDirection::Up);
        }
        for _ in 0..2 {
            store.vote(&newer, VoteDirection::Down);
        }
        for _ in 0..5 {
            store.vote(&older, VoteDirection::Up);
        }
        for _ in 0..5 {
            store.vote(&older, VoteDirection::Down);
        }

        // Default order: year descending
        assert_eq!(store.policies()[0].id, newer);
        assert_eq!(store.policies()[1].id, older);

        store.set_sort_order(SortOrder::PopularityDesc);
        assert_eq!(store.policies()[0].id, newer); // ratio 0.833
        assert_eq!(store.policies()[1].id, older); // ratio 0.5

        store.set_sort_order(SortOrder::PopularityAsc);
        assert_eq!(store.policies()[0].id, older);
        assert_eq!(store.policies()[1].id, newer);
    }

    #[test]
    fn test_newest_sort_is_stable_for_equal_years() {
        let mut store = PolicyStore::default();
        let first = store.add_policy(draft("first", Some(2024)));
        let second = store.add_policy(draft("second", Some(2024)));
        store.set_sort_order(SortOrder::Newest);
        assert_eq!(store.policies()[0].id, first);
        assert_eq!(store.policies()[1].id, second);
    }

    #[test]
    fn test_missing_year_sorts_as_zero() {
        let mut store = PolicyStore::default();
        store.add_policy(draft("undated", None));
        store.add_policy(draft("dated", Some(2023)));
        assert_eq!(store.policies()[0].title, "dated");
        assert_eq!(store.policies()[1].title, "undated");
    }

    #[test]
    fn test_filtered_empty_term_is_identity() {
        let store = seeded_store();
        let all = store.filtered("");
        assert_eq!(all.len(), store.policies().len());
        for (filtered, stored) in all.iter().zip(store.policies()) {
            assert_eq!(filtered.id, stored.id);
        }
    }

    #[test]
    fn test_filtered_is_case_insensitive() {
        let mut store = PolicyStore::default();
        let mut d = draft("Eco Park", Some(2024));
        d.keywords = vec!["recycling".to_string()];
        store.add_policy(d);
        store.add_policy(draft("道路補修", Some(2024)));

        let upper = store.filtered("ECO");
        let lower = store.filtered("eco");
        assert_eq!(upper.len(), 1);
        assert_eq!(upper.len(), lower.len());
        assert_eq!(upper[0].id, lower[0].id);
    }

    #[test]
    fn test_filtered_keeps_whitespace_in_term() {
        let mut store = PolicyStore::default();
        store.add_policy(draft("Eco Park", Some(2024)));
        store.add_policy(draft("Green Eco Zone", Some(2024)));
        // The leading space is part of the term, not stripped
        let results = store.filtered(" eco");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Green Eco Zone");
    }

    #[test]
    fn test_filtered_matches_list_fields() {
        let mut store = PolicyStore::default();
        let mut d = draft("a", Some(2024));
        d.problems = vec!["渋滞の慢性化".to_string()];
        store.add_policy(d);
        store.add_policy(draft("b", Some(2024)));
        assert_eq!(store.filtered("渋滞").len(), 1);
        assert!(store.filtered("存在しない語").is_empty());
    }

    #[test]
    fn test_comment_does_not_resort() {
        let mut store = PolicyStore::default();
        let a = store.add_policy(draft("a", Some(2024)));
        let b = store.add_policy(draft("b", Some(2023)));
        store.vote(&b, VoteDirection::Up);
        store.set_sort_order(SortOrder::PopularityDesc);
        assert_eq!(store.policies()[0].id, b);
        // Commenting on the unvoted policy must not move anything
        store.add_comment(&a, "感想", true);
        assert_eq!(store.policies()[0].id, b);
        assert_eq!(store.policies()[1].id, a);
    }

    #[test]
    fn test_observer_sees_snapshots() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        let mut store = PolicyStore::default();
        store.subscribe(move |policies| {
            seen_clone.borrow_mut().push(policies.len());
        });
        store.add_policy(draft("a", Some(2024)));
        store.add_policy(draft("b", Some(2024)));
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }
}
