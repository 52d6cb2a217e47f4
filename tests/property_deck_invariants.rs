use std::collections::HashSet;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use flashcard_study::deck::{
    apply_swipe, Card, CardTemplate, ProgressionPolicy, StudyState, SwipeDirection,
};

fn deck_of(len: usize) -> StudyState {
    StudyState {
        deck: (0..len)
            .map(|i| Card::from_template(&CardTemplate::new(&format!("card-{i}"), "back", None)))
            .collect(),
        ..StudyState::default()
    }
}

fn direction() -> impl Strategy<Value = SwipeDirection> {
    prop_oneof![Just(SwipeDirection::Left), Just(SwipeDirection::Right)]
}

proptest! {
    #[test]
    fn pt_swipe_removes_head_or_requeues(len in 1_usize..20, dir in direction()) {
        let state = deck_of(len);
        let (next, report) = apply_swipe(&state, dir, &ProgressionPolicy::default());
        let report = report.unwrap();

        prop_assert_eq!(&report.front, &state.deck[0].front);
        prop_assert!(next.deck.len() == len || next.deck.len() == len - 1);
        prop_assert_eq!(state.deck.len(), len);

        if len > 1 {
            prop_assert_eq!(next.deck[0].key, state.deck[1].key);
        }
        let swiped = state.deck[0].key;
        let rest_before: Vec<_> = state.deck[1..].iter().map(|c| c.key).collect();
        let rest_after: Vec<_> =
            next.deck.iter().map(|c| c.key).filter(|k| *k != swiped).collect();
        prop_assert_eq!(rest_before, rest_after);
    }

    #[test]
    fn pt_levels_follow_direction(moves in prop::collection::vec(direction(), 1..60)) {
        let policy = ProgressionPolicy::default();
        let mut state = deck_of(6);

        for dir in moves {
            let Some(head) = state.deck.first().cloned() else { break };
            let (next, report) = apply_swipe(&state, dir, &policy);
            let report = report.unwrap();
            match dir {
                SwipeDirection::Left => prop_assert_eq!(report.level, head.level.saturating_sub(1)),
                SwipeDirection::Right => prop_assert_eq!(report.level, head.level + 1),
            }
            state = next;
        }
    }

    #[test]
    fn pt_front_in_at_most_one_list(moves in prop::collection::vec(direction(), 0..80)) {
        let policy = ProgressionPolicy::default();
        let mut state = deck_of(8);

        for dir in moves {
            state = apply_swipe(&state, dir, &policy).0;

            let remembered: Vec<&str> = state.remembered.iter().map(|c| c.front.as_str()).collect();
            let forgotten: Vec<&str> = state.forgotten.iter().map(|c| c.front.as_str()).collect();
            let r_set: HashSet<&str> = remembered.iter().copied().collect();
            let f_set: HashSet<&str> = forgotten.iter().copied().collect();

            prop_assert_eq!(r_set.len(), remembered.len());
            prop_assert_eq!(f_set.len(), forgotten.len());
            prop_assert!(r_set.is_disjoint(&f_set));
        }
    }

    #[test]
    fn pt_forgotten_reinsert_index(len in 1_usize..30) {
        let policy = ProgressionPolicy::default();
        let state = deck_of(len);
        let head_key = state.deck[0].key;

        let (next, _) = apply_swipe(&state, SwipeDirection::Left, &policy);
        let position = next.deck.iter().position(|c| c.key == head_key).unwrap();
        prop_assert_eq!(position, policy.forgotten_requeue_depth.min(len - 1));
    }

    #[test]
    fn pt_graduated_cards_never_return(moves in prop::collection::vec(direction(), 0..80)) {
        let policy = ProgressionPolicy::default();
        let mut state = deck_of(5);

        for dir in moves {
            let (next, _) = apply_swipe(&state, dir, &policy);
            prop_assert!(next.deck.iter().all(|c| c.level < policy.graduation_level));
            state = next;
        }
    }

    #[test]
    fn pt_shuffle_is_permutation(
        items in prop::collection::vec(any::<u16>(), 0..64),
        seed in any::<u64>(),
    ) {
        let mut shuffled = items.clone();
        shuffled.shuffle(&mut StdRng::seed_from_u64(seed));

        let mut a = items;
        let mut b = shuffled;
        a.sort_unstable();
        b.sort_unstable();
        prop_assert_eq!(a, b);
    }
}
