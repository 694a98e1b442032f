use domains_registry::{AccountId, Amount, DomainRegistry, RegistryConfig, RegistryError};
use proptest::prelude::*;

// Property-based tests for registry invariants
// Random call sequences must never break uniqueness, ownership or accounting

const MIN_PRICE_ATOMIC: u128 = 100_000_000_000_000_000; // 0.1

#[derive(Debug, Clone)]
enum Call {
    Register { caller: u8, label: u8, payment: u128 },
    SetRecord { caller: u8, label: u8, data: String },
    Withdraw { caller: u8, amount: u128 },
}

const ADMIN: u8 = 0;
const LABELS: [&str; 4] = ["apple", "mango", "kiwi", "plum"];

fn account(n: u8) -> AccountId {
    AccountId::derive(&format!("account-{n}"))
}

fn registry() -> DomainRegistry {
    DomainRegistry::new(RegistryConfig::new(
        "fruit",
        Amount::from_atomic(MIN_PRICE_ATOMIC),
        account(ADMIN),
    ))
    .unwrap()
}

fn arbitrary_call() -> impl Strategy<Value = Call> {
    prop_oneof![
        (0u8..4, 0u8..4, 0u128..=3 * MIN_PRICE_ATOMIC)
            .prop_map(|(caller, label, payment)| Call::Register { caller, label, payment }),
        (0u8..4, 0u8..4, ".{0,16}")
            .prop_map(|(caller, label, data)| Call::SetRecord { caller, label, data }),
        (0u8..2, 0u128..=2 * MIN_PRICE_ATOMIC)
            .prop_map(|(caller, amount)| Call::Withdraw { caller, amount }),
    ]
}

proptest! {
    #[test]
    fn invariants_hold_over_random_calls(
        calls in prop::collection::vec(arbitrary_call(), 1..40),
    ) {
        let registry = registry();
        let mut successful_registrations: Vec<(&str, AccountId)> = Vec::new();
        let mut expected_balance: u128 = 0;
        let mut expected_data: std::collections::HashMap<&str, String> = Default::default();

        for call in calls {
            match call {
                Call::Register { caller, label, payment } => {
                    let label = LABELS[label as usize];
                    let taken = successful_registrations.iter().any(|(l, _)| *l == label);
                    let result = registry.register(&account(caller), label, Amount::from_atomic(payment));

                    if taken {
                        let is_taken_error = matches!(result, Err(RegistryError::AlreadyRegistered { .. }));
                        prop_assert!(is_taken_error);
                    } else if payment < MIN_PRICE_ATOMIC {
                        let is_payment_error = matches!(result, Err(RegistryError::InsufficientPayment { .. }));
                        prop_assert!(is_payment_error);
                        prop_assert!(registry.is_available(label));
                    } else {
                        prop_assert!(result.is_ok());
                        successful_registrations.push((label, account(caller)));
                        expected_balance += payment;
                        expected_data.insert(label, String::new());
                    }
                }
                Call::SetRecord { caller, label, data } => {
                    let label = LABELS[label as usize];
                    let owner = successful_registrations
                        .iter()
                        .find(|(l, _)| *l == label)
                        .map(|(_, owner)| *owner);
                    let result = registry.set_record(&account(caller), label, data.clone());

                    match owner {
                        None => {
                            let is_missing = matches!(result, Err(RegistryError::NotRegistered { .. }));
                            prop_assert!(is_missing);
                        }
                        Some(owner) if owner == account(caller) => {
                            prop_assert!(result.is_ok());
                            expected_data.insert(label, data);
                        }
                        Some(_) => {
                            let is_unauthorized = matches!(result, Err(RegistryError::Unauthorized { .. }));
                            prop_assert!(is_unauthorized);
                        }
                    }
                }
                Call::Withdraw { caller, amount } => {
                    let result = registry.withdraw(&account(caller), Amount::from_atomic(amount));
                    if caller != ADMIN {
                        let is_unauthorized = matches!(result, Err(RegistryError::Unauthorized { .. }));
                        prop_assert!(is_unauthorized);
                    } else if amount > expected_balance {
                        let is_overdraw = matches!(result, Err(RegistryError::InsufficientBalance { .. }));
                        prop_assert!(is_overdraw);
                    } else {
                        prop_assert!(result.is_ok());
                        expected_balance -= amount;
                    }
                }
            }

            prop_assert_eq!(registry.get_balance().atomic(), expected_balance);
        }

        prop_assert_eq!(registry.total_registered() as usize, successful_registrations.len());
        for (label, owner) in &successful_registrations {
            prop_assert_eq!(registry.get_owner(label).unwrap(), *owner);
            prop_assert_eq!(&registry.get_record(label).unwrap(), &expected_data[label]);
        }
    }
}

proptest! {
    #[test]
    fn record_round_trips_any_text(data in ".*") {
        let registry = registry();
        let owner = account(1);
        registry.register(&owner, "mango", Amount::from_atomic(MIN_PRICE_ATOMIC)).unwrap();
        registry.set_record(&owner, "mango", data.clone()).unwrap();
        prop_assert_eq!(registry.get_record("mango").unwrap(), data);
    }
}

proptest! {
    #[test]
    fn underpayment_never_changes_state(payment in 0u128..MIN_PRICE_ATOMIC) {
        let registry = registry();
        let result = registry.register(&account(1), "plum", Amount::from_atomic(payment));

        let is_payment_error = matches!(result, Err(RegistryError::InsufficientPayment { .. }));
        prop_assert!(is_payment_error);
        prop_assert_eq!(registry.get_balance(), Amount::ZERO);
        prop_assert_eq!(registry.total_registered(), 0);
        prop_assert!(registry.get_owner("plum").is_err());
    }
}

proptest! {
    #[test]
    fn each_successful_registration_adds_at_least_min_price(
        payments in prop::collection::vec(MIN_PRICE_ATOMIC..=10 * MIN_PRICE_ATOMIC, 1..4),
    ) {
        let registry = registry();
        for (i, payment) in payments.iter().enumerate() {
            let before = registry.get_balance().atomic();
            registry
                .register(&account(1), LABELS[i], Amount::from_atomic(*payment))
                .unwrap();
            let after = registry.get_balance().atomic();
            prop_assert!(after >= before + MIN_PRICE_ATOMIC);
            prop_assert_eq!(after - before, *payment);
        }
    }
}
