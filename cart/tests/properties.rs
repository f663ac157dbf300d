//! Property tests for cart invariants.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use proptest::prelude::*;
use session_cart::{
    CartAction, CartController, CartEnvironment, CartPersistence, CartReducer, CartState, Product,
    ProductId, RestorePolicy,
};
use session_cart_core::reducer::Reducer;
use session_cart_runtime::MemorySessionStorage;
use std::collections::HashSet;

/// Small id space so sequences revisit the same products
fn arb_product() -> impl Strategy<Value = Product> {
    (1_i64..6, 1_i64..500).prop_map(|(id, price)| {
        Product::new(ProductId::new(id), format!("Product {id}"), "", price)
    })
}

fn arb_action() -> impl Strategy<Value = CartAction> {
    prop_oneof![
        3 => arb_product().prop_map(CartAction::Add),
        2 => arb_product().prop_map(CartAction::UpdateQuantity),
        1 => (1_i64..8).prop_map(|id| CartAction::Delete(ProductId::new(id))),
    ]
}

fn apply(actions: Vec<CartAction>) -> CartState {
    let reducer = CartReducer::new();
    let env = CartEnvironment::new();
    let mut state = CartState::new();
    for action in actions {
        reducer.reduce(&mut state, action, &env);
    }
    state
}

fn ids(state: &CartState) -> Vec<ProductId> {
    state.lines().iter().map(|line| line.product.id).collect()
}

#[derive(Clone, Debug)]
enum Intention {
    Add(Product),
    Delete(ProductId),
}

fn arb_intention() -> impl Strategy<Value = Intention> {
    prop_oneof![
        3 => arb_product().prop_map(Intention::Add),
        1 => (1_i64..8).prop_map(|id| Intention::Delete(ProductId::new(id))),
    ]
}

proptest! {
    #[test]
    fn lines_stay_unique_with_positive_quantities(actions in prop::collection::vec(arb_action(), 0..40)) {
        let state = apply(actions);

        let unique: HashSet<ProductId> = ids(&state).into_iter().collect();
        prop_assert_eq!(unique.len(), state.len());
        prop_assert!(state.lines().iter().all(|line| line.quantity >= 1));
    }

    #[test]
    fn update_quantity_keeps_line_order(
        setup in prop::collection::vec(arb_action(), 0..20),
        product in arb_product(),
    ) {
        let mut state = apply(setup);
        let before = state.clone();

        CartReducer::new().reduce(&mut state, CartAction::UpdateQuantity(product.clone()), &CartEnvironment::new());

        prop_assert_eq!(ids(&state), ids(&before));
        for (after, prior) in state.lines().iter().zip(before.lines()) {
            let expected = if after.product.id == product.id { prior.quantity + 1 } else { prior.quantity };
            prop_assert_eq!(after.quantity, expected);
        }
    }

    #[test]
    fn delete_keeps_survivor_order(
        setup in prop::collection::vec(arb_action(), 0..20),
        id in 1_i64..8,
    ) {
        let mut state = apply(setup);
        let id = ProductId::new(id);
        let expected: Vec<ProductId> = ids(&state).into_iter().filter(|other| *other != id).collect();

        CartReducer::new().reduce(&mut state, CartAction::Delete(id), &CartEnvironment::new());

        prop_assert_eq!(ids(&state), expected);
    }

    #[test]
    fn delete_is_idempotent(
        setup in prop::collection::vec(arb_action(), 0..20),
        id in 1_i64..8,
    ) {
        let reducer = CartReducer::new();
        let env = CartEnvironment::new();
        let id = ProductId::new(id);
        let mut once = apply(setup);
        let mut twice = once.clone();

        reducer.reduce(&mut once, CartAction::Delete(id), &env);
        reducer.reduce(&mut twice, CartAction::Delete(id), &env);
        reducer.reduce(&mut twice, CartAction::Delete(id), &env);

        prop_assert_eq!(once, twice);
    }

    #[test]
    fn saved_cart_loads_back_equal(actions in prop::collection::vec(arb_action(), 0..30)) {
        let state = apply(actions);
        let persistence = CartPersistence::new(MemorySessionStorage::new());

        persistence.save(&state).unwrap();

        prop_assert_eq!(persistence.load().unwrap(), state);
    }

    #[test]
    fn controller_matches_quantity_model(intentions in prop::collection::vec(arb_intention(), 0..25)) {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();

        let (state, stored) = runtime.block_on(async {
            let persistence = CartPersistence::new(MemorySessionStorage::new());
            let controller = CartController::new(persistence, RestorePolicy::Strict).unwrap();
            for intention in intentions.clone() {
                match intention {
                    Intention::Add(product) => controller.add_product(product).await.unwrap(),
                    Intention::Delete(id) => controller.delete_product(id).await.unwrap(),
                }
            }
            (controller.cart_items().await, controller.persistence().load().unwrap())
        });

        // Reference model: ordered (id, quantity) pairs
        let mut model: Vec<(ProductId, u32)> = Vec::new();
        for intention in intentions {
            match intention {
                Intention::Add(product) => match model.iter_mut().find(|(id, _)| *id == product.id) {
                    Some((_, quantity)) => *quantity += 1,
                    None => model.push((product.id, 1)),
                },
                Intention::Delete(id) => model.retain(|(other, _)| *other != id),
            }
        }

        let actual: Vec<(ProductId, u32)> =
            state.lines().iter().map(|line| (line.product.id, line.quantity)).collect();
        prop_assert_eq!(actual, model);
        prop_assert_eq!(stored, state);
    }
}
