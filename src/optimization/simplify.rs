use crate::core::ledger::{Ledger, LedgerError};
use crate::core::obligation::Payment;
use crate::core::person::PersonId;
use crate::graph::partition::Group;
use log::{debug, error};
use rust_decimal::Decimal;
use serde::Serialize;
use std::cmp::Ordering;
use thiserror::Error;

/// Failures while settling a group.
///
/// Balances taken from a [`Ledger`] never produce these: the ledger is
/// symmetric and bounds every sum by its gross total. They guard
/// [`DebtSimplifier::settle_balances`] against arbitrary balance vectors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    #[error("group is unbalanced: creditors are owed {credit} but debtors owe {debit}")]
    UnbalancedGroup { credit: Decimal, debit: Decimal },
    #[error("creditors exhausted while {debtor} still owes {outstanding}")]
    CreditorsExhausted { debtor: PersonId, outstanding: Decimal },
    #[error("sum of balances does not fit in a decimal")]
    Overflow,
    #[error("recording a payment failed: {0}")]
    Ledger(#[from] LedgerError),
}

/// One settlement step: `debtor` pays `creditor` `amount`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    pub debtor: PersonId,
    pub creditor: PersonId,
    pub amount: Decimal,
}

/// The simplified form of one group.
#[derive(Debug, Clone, Serialize)]
pub struct GroupSettlement {
    /// Members of the group that was settled.
    pub members: Vec<PersonId>,
    /// Payments that realize the group's net balances.
    pub payments: Vec<Payment>,
    /// Fresh ledger holding only the settlement relations; it knows exactly
    /// the people who take part in a payment.
    pub ledger: Ledger,
}

impl GroupSettlement {
    pub fn payment_count(&self) -> usize {
        self.payments.len()
    }
}

/// Greedy minimum-payment settlement of connected groups.
pub struct DebtSimplifier;

impl DebtSimplifier {
    /// Settle one group of `ledger`.
    ///
    /// The source ledger is only read; the result carries a new ledger built
    /// from the emitted payments, whose net balances equal the group's
    /// nonzero input balances.
    pub fn simplify(ledger: &Ledger, group: &Group) -> Result<GroupSettlement, SettlementError> {
        let balances: Vec<(PersonId, Decimal)> = group
            .members
            .iter()
            .map(|&id| (id, ledger.net_balance(id)))
            .collect();

        let transfers = Self::settle_balances(&balances)?;

        let mut fresh = Ledger::new();
        let mut payments = Vec::with_capacity(transfers.len());
        for t in transfers {
            let payment = Payment {
                debtor: ledger.name(t.debtor).to_string(),
                creditor: ledger.name(t.creditor).to_string(),
                amount: t.amount,
            };
            debug!("{}", payment);
            fresh.add_obligation(&payment.debtor, &payment.creditor, payment.amount)?;
            payments.push(payment);
        }

        Ok(GroupSettlement {
            members: group.members.clone(),
            payments,
            ledger: fresh,
        })
    }

    /// Compute the fewest transfers that realize a vector of net balances.
    ///
    /// # Algorithm
    ///
    /// 1. Drop zero balances; split the rest into creditors (> 0) and
    ///    debtors (< 0).
    /// 2. Sort creditors descending and debtors ascending (most negative
    ///    first), ties by id.
    /// 3. Walk both lists with one pointer each. Every step pays the smaller
    ///    of the two remaining amounts and exhausts at least one side, so at
    ///    most `n - 1` transfers are emitted for `n` nonzero balances.
    ///
    /// The balances must sum to exactly zero.
    pub fn settle_balances(
        balances: &[(PersonId, Decimal)],
    ) -> Result<Vec<Transfer>, SettlementError> {
        let mut creditors: Vec<(PersonId, Decimal)> = Vec::new();
        let mut debtors: Vec<(PersonId, Decimal)> = Vec::new();
        for &(id, balance) in balances {
            match balance.cmp(&Decimal::ZERO) {
                Ordering::Greater => creditors.push((id, balance)),
                Ordering::Less => debtors.push((id, balance)),
                Ordering::Equal => {}
            }
        }

        if creditors.is_empty() && debtors.is_empty() {
            return Ok(Vec::new());
        }

        let credit = checked_sum(creditors.iter().map(|(_, b)| *b))?;
        let debit = checked_sum(debtors.iter().map(|(_, b)| -*b))?;
        if credit != debit {
            error!("unbalanced group: credit {} vs debit {}", credit, debit);
            return Err(SettlementError::UnbalancedGroup { credit, debit });
        }

        creditors.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        debtors.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));

        walk(&creditors, &debtors)
    }
}

fn checked_sum(mut amounts: impl Iterator<Item = Decimal>) -> Result<Decimal, SettlementError> {
    amounts
        .try_fold(Decimal::ZERO, |acc, b| acc.checked_add(b))
        .ok_or_else(|| {
            error!("balance sum overflowed");
            SettlementError::Overflow
        })
}

/// Two-pointer pass over sorted creditors and debtors. With balanced
/// input the residual is a difference of two amounts of opposite sign, so
/// it cannot overflow.
fn walk(
    creditors: &[(PersonId, Decimal)],
    debtors: &[(PersonId, Decimal)],
) -> Result<Vec<Transfer>, SettlementError> {
    let mut transfers = Vec::new();
    let mut i = 0;
    let mut c_money = creditors.first().map(|c| c.1).unwrap_or(Decimal::ZERO);

    for &(debtor, balance) in debtors {
        let mut d_money = balance;

        while d_money < Decimal::ZERO {
            let Some(&(creditor, _)) = creditors.get(i) else {
                error!("creditors exhausted, {} still owes {}", debtor, -d_money);
                return Err(SettlementError::CreditorsExhausted {
                    debtor,
                    outstanding: -d_money,
                });
            };

            let residual = c_money + d_money;
            match residual.cmp(&Decimal::ZERO) {
                Ordering::Greater => {
                    transfers.push(Transfer { debtor, creditor, amount: -d_money });
                    c_money = residual;
                    d_money = Decimal::ZERO;
                }
                Ordering::Less => {
                    transfers.push(Transfer { debtor, creditor, amount: c_money });
                    d_money = residual;
                    i += 1;
                    c_money = creditors.get(i).map(|c| c.1).unwrap_or(Decimal::ZERO);
                }
                Ordering::Equal => {
                    transfers.push(Transfer { debtor, creditor, amount: c_money });
                    d_money = Decimal::ZERO;
                    i += 1;
                    c_money = creditors.get(i).map(|c| c.1).unwrap_or(Decimal::ZERO);
                }
            }
        }
    }

    Ok(transfers)
}
