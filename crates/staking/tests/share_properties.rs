// Path: crates/staking/tests/share_properties.rs

mod common;

use anyhow::Result;
use common::Harness;
use ledger_staking::delegation::get_validator_delegations;
use ledger_test_utils::fixtures::{account, validator_id};
use ledger_types::app::{BondStatus, Dec, Rounding, Shares};
use proptest::prelude::*;

const DELEGATORS: [u8; 3] = [1, 2, 3];

#[derive(Debug, Clone)]
enum Op {
    Delegate(u8, u64),
    /// Unbond this percentage of the delegator's shares.
    Unbond(u8, u64),
    /// Burn this percentage of the validator's tokens.
    Slash(u64),
}

fn op() -> impl Strategy<Value = Op> {
    let delegator = prop::sample::select(DELEGATORS.to_vec());
    prop_oneof![
        4 => (delegator.clone(), 1u64..100_000_000_000_000_000).prop_map(|(d, a)| Op::Delegate(d, a)),
        3 => (delegator, 1u64..=100).prop_map(|(d, p)| Op::Unbond(d, p)),
        1 => (1u64..=50).prop_map(Op::Slash),
    ]
}

fn slash(h: &mut Harness, pct: u64) -> Result<()> {
    let mut v = h.validator(9)?;
    let burned = u128::from(v.tokens) * u128::from(pct) / 100;
    v.tokens -= u64::try_from(burned)?;
    h.put_validator(v)?;
    Ok(())
}

fn held(h: &Harness, del: u8) -> Result<Shares> {
    Ok(h.delegation(del, 9)?.map(|d| d.shares).unwrap_or(Shares::ZERO))
}

fn unbond(h: &mut Harness, del: u8, shares: Shares) -> Result<u64> {
    Ok(h
        .keeper
        .unbond(&mut h.state, &account(del), &validator_id(9), shares)?)
}

/// The validator's share total equals the sum of its delegations' shares.
fn assert_conserved(h: &Harness) -> Result<()> {
    let v = h.validator(9)?;
    let mut sum = Shares::ZERO;
    for d in get_validator_delegations(&h.state, &validator_id(9))? {
        sum = sum.checked_add(d.shares).ok_or_else(|| anyhow::anyhow!("overflow"))?;
    }
    assert_eq!(v.delegator_shares, sum);
    Ok(())
}

#[test]
fn large_stake_after_slash_stays_fully_withdrawable() -> Result<()> {
    let mut h = Harness::new();
    h.add_validator(9, BondStatus::Bonded)?;
    h.delegate(1, 9, 1_000_000_000_000_000)?;
    let mut v = h.validator(9)?;
    v.tokens -= 1;
    h.put_validator(v)?;

    let issued = h.delegate(2, 9, 1)?;
    assert_eq!(issued, "1.000000000000001".parse::<Dec>()?);
    assert_conserved(&h)?;

    let held_1 = held(&h, 1)?;
    let a = unbond(&mut h, 1, held_1)?;
    let held_2 = held(&h, 2)?;
    let b = unbond(&mut h, 2, held_2)?;
    // The last delegator out takes whatever truncation left behind.
    assert_eq!(a + b, 1_000_000_000_000_000);
    let v = h.validator(9)?;
    assert!(v.delegator_shares.is_zero());
    assert_eq!(v.tokens, 0);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn shares_are_conserved_and_always_withdrawable(ops in prop::collection::vec(op(), 1..24)) {
        let mut h = Harness::new();
        h.add_validator(9, BondStatus::Bonded).unwrap();
        let mut deposited: u128 = 0;
        let mut withdrawn: u128 = 0;

        for op in ops {
            match op {
                Op::Delegate(del, amount) => {
                    if h.validator(9).unwrap().invalid_ex_rate() {
                        prop_assert!(h.delegate(del, 9, amount).is_err());
                        continue;
                    }
                    let before = held(&h, del).unwrap();
                    let issued = h.delegate(del, 9, amount).unwrap();
                    prop_assert_eq!(held(&h, del).unwrap(), before.checked_add(issued).unwrap());
                    deposited += u128::from(amount);
                }
                Op::Unbond(del, pct) => {
                    let have = held(&h, del).unwrap();
                    let shares = if pct == 100 {
                        have
                    } else {
                        have.checked_mul_div(Dec::from_int(pct), Dec::from_int(100), Rounding::Down)
                            .unwrap()
                    };
                    if shares.is_zero() {
                        continue;
                    }
                    withdrawn += u128::from(unbond(&mut h, del, shares).unwrap());
                    prop_assert_eq!(held(&h, del).unwrap(), have.checked_sub(shares).unwrap());
                }
                Op::Slash(pct) => slash(&mut h, pct).unwrap(),
            }
            assert_conserved(&h).unwrap();
        }

        // Everyone can leave with exactly the shares they hold.
        for del in DELEGATORS {
            let have = held(&h, del).unwrap();
            if !have.is_zero() {
                withdrawn += u128::from(unbond(&mut h, del, have).unwrap());
            }
            assert_conserved(&h).unwrap();
        }
        let v = h.validator(9).unwrap();
        prop_assert!(v.delegator_shares.is_zero());
        prop_assert_eq!(v.tokens, 0);
        prop_assert!(withdrawn <= deposited);
    }

    #[test]
    fn withdrawals_never_exceed_deposits(
        seed in 1u64..1_000_000_000_000_000_000,
        burned in 0u64..=50,
        amount in 1u64..1_000_000_000_000_000_000,
        pct in 1u64..=100,
    ) {
        let mut h = Harness::new();
        h.add_validator(9, BondStatus::Bonded).unwrap();
        h.delegate(2, 9, seed).unwrap();
        slash(&mut h, burned).unwrap();

        let issued = h.delegate(1, 9, amount).unwrap();
        let shares = issued
            .checked_mul_div(Dec::from_int(pct), Dec::from_int(100), Rounding::Down)
            .unwrap();
        prop_assume!(!shares.is_zero());

        let released = unbond(&mut h, 1, shares).unwrap();
        prop_assert!(released <= amount);
        assert_conserved(&h).unwrap();
    }
}
