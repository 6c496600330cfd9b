use proptest::prelude::*;
use reimburse_core::features::FeatureLayout;
use reimburse_core::gbdt::{GbdtModel, Model, Node, Tree};
use reimburse_core::rules::{mileage_amount, receipt_amount};
use reimburse_core::{calculate_reimbursement, ResidualModel, TripInput};
use rust_decimal::Decimal;

fn cents(value: u64) -> Decimal {
    Decimal::new(value as i64, 2)
}

fn trip(days: u32, miles: Decimal, receipts: Decimal) -> TripInput {
    TripInput::new(days, miles, receipts).unwrap()
}

/// A single-leaf model whose raw prediction is exactly `raw`.
fn constant_model(raw: f64, shrink: Decimal, cap: Decimal) -> ResidualModel {
    ResidualModel::new(
        FeatureLayout::default_order(),
        GbdtModel::Single(Model::new(vec![Tree::new(vec![Node::leaf(raw)])], 1.0, 0.0)),
        shrink,
        cap,
    )
    .unwrap()
}

fn splitting_model() -> ResidualModel {
    let tree = |threshold: f64| {
        Tree::new(vec![
            Node::internal(3, threshold, 1, 2),
            Node::internal(2, 800.0, 3, 4),
            Node::leaf(-25.0),
            Node::leaf(12.5),
            Node::leaf(-7.25),
        ])
    };
    ResidualModel::new(
        FeatureLayout::default_order(),
        GbdtModel::Ensemble {
            model1: Model::new(vec![tree(120.0), tree(180.0)], 0.3, -2.0),
            model2: Model::new(vec![tree(60.0)], 0.7, 1.5),
        },
        Decimal::new(9, 1),
        Decimal::from(600),
    )
    .unwrap()
}

proptest! {
    #[test]
    fn residual_is_shrunk_then_capped(
        raw in -100_000.0f64..100_000.0,
        shrink_pct in 0u32..=200,
        cap in 0u32..=1_000,
    ) {
        let shrink = Decimal::new(i64::from(shrink_pct), 2);
        let cap = Decimal::from(cap);
        let model = constant_model(raw, shrink, cap);

        let residual = model.residual(&trip(3, Decimal::ZERO, Decimal::ZERO)).unwrap();
        let expected = (raw.to_string().parse::<Decimal>().unwrap() * shrink).clamp(-cap, cap);

        prop_assert!(residual >= -cap && residual <= cap);
        prop_assert_eq!(residual, expected);
    }

    #[test]
    fn residual_saturates_for_any_finite_magnitude(
        magnitude in prop_oneof![1e4f64..1e28, 1e28f64..1e300],
        negative in any::<bool>(),
        shrink_pct in 1u32..=200,
        cap in 0u32..=1_000,
    ) {
        let raw = if negative { -magnitude } else { magnitude };
        let cap = Decimal::from(cap);
        let model = constant_model(raw, Decimal::new(i64::from(shrink_pct), 2), cap);

        let residual = model.post_process(raw).unwrap();
        if magnitude * f64::from(shrink_pct) / 100.0 > 2_000.0 {
            let expected = if negative { -cap } else { cap };
            prop_assert_eq!(residual.round_cents().unwrap(), expected);
        } else {
            prop_assert!(residual >= -cap && residual <= cap);
        }
    }

    #[test]
    fn cents_quirk_adds_five_dollars(
        days in 1u32..=40,
        dollars in 0u64..5_000,
        quirk in prop::sample::select(vec![49u64, 99]),
    ) {
        let quirk_amount = receipt_amount(&trip(days, Decimal::ZERO, cents(dollars * 100 + quirk)));
        let below = receipt_amount(&trip(days, Decimal::ZERO, cents(dollars * 100 + quirk - 1)));
        let above = receipt_amount(&trip(days, Decimal::ZERO, cents(dollars * 100 + quirk + 1)));
        let without_bonus = quirk_amount - Decimal::from(5);

        // The base layer is continuous and increasing, so removing the bonus
        // lands strictly between the neighbouring cent amounts.
        prop_assert!(below < without_bonus, "{} !< {}", below, without_bonus);
        prop_assert!(without_bonus < above, "{} !< {}", without_bonus, above);
    }

    #[test]
    fn cents_quirk_is_exactly_five_dollars_in_linear_region(
        days in 2u32..=30,
        dollars in 0u64..100,
        quirk in prop::sample::select(vec![49u64, 99]),
    ) {
        let zeroed = cents(dollars * 100);
        let with_cents = cents(dollars * 100 + quirk);

        let base = receipt_amount(&trip(days, Decimal::ZERO, zeroed));
        let bumped = receipt_amount(&trip(days, Decimal::ZERO, with_cents));

        // Both amounts sit under every multi-day cap, where the rate is 0.60.
        let rate = Decimal::new(60, 2);
        prop_assert_eq!(bumped - base, (with_cents - zeroed) * rate + Decimal::from(5));
    }

    #[test]
    fn mileage_strictly_increases_within_a_tier(
        days in 1u32..=20,
        tier in prop::sample::select(vec![(1u64, 9_999u64), (10_001, 49_999), (50_001, 69_999)]),
        a in 0u64..100_000,
        b in 0u64..100_000,
    ) {
        let (lo, hi) = tier;
        let span = hi - lo;
        let (x, y) = (lo + a % span, lo + b % span);
        prop_assume!(x != y);
        let (x, y) = (x.min(y), x.max(y));

        let m_x = mileage_amount(&trip(days, cents(x), Decimal::ZERO));
        let m_y = mileage_amount(&trip(days, cents(y), Decimal::ZERO));
        prop_assert!(m_x < m_y, "{} mi → {}, {} mi → {}", cents(x), m_x, cents(y), m_y);
    }

    #[test]
    fn reimbursement_is_deterministic(
        days in 1u32..=30,
        miles in 0u64..200_000,
        receipts in 0u64..300_000,
    ) {
        let model = splitting_model();
        let input = trip(days, cents(miles), cents(receipts));

        let first = calculate_reimbursement(&input, &model).unwrap();
        let second = calculate_reimbursement(&input, &model).unwrap();
        prop_assert_eq!(first, second);
        prop_assert_eq!(first.round_dp(2), first);
    }
}
