use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons an obligation record is refused at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObligationError {
    #[error("obligation amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("'{0}' cannot owe money to themselves")]
    SelfObligation(String),
    #[error("person name must not be empty")]
    EmptyName,
}

/// A single IOU: `debtor` owes `creditor` a positive `amount`.
///
/// This is the literal input event, e.g. one line of a shared-expense
/// sheet. Obligations are immutable once created, and deserialization goes
/// through the same checks as [`Obligation::try_new`].
///
/// # Examples
///
/// ```
/// use settle_up::core::obligation::Obligation;
/// use rust_decimal_macros::dec;
///
/// let dinner = Obligation::new("Bob", "Alice", dec!(42.50));
/// assert_eq!(dinner.debtor(), "Bob");
/// assert_eq!(dinner.creditor(), "Alice");
/// assert_eq!(dinner.amount(), dec!(42.50));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawObligation")]
pub struct Obligation {
    /// The person who owes the amount.
    debtor: String,
    /// The person who is owed the amount (usually whoever paid).
    creditor: String,
    /// The amount owed. Always positive.
    amount: Decimal,
    /// Optional free-text note, e.g. what the expense was for.
    memo: Option<String>,
}

impl Obligation {
    /// Create a new obligation.
    ///
    /// # Panics
    ///
    /// Panics if the record is invalid; see [`Obligation::try_new`] for the
    /// fallible constructor.
    pub fn new(debtor: impl Into<String>, creditor: impl Into<String>, amount: Decimal) -> Self {
        match Self::try_new(debtor, creditor, amount) {
            Ok(ob) => ob,
            Err(e) => panic!("invalid obligation: {}", e),
        }
    }

    /// Create a new obligation, rejecting non-positive amounts, empty names
    /// and self-obligations.
    pub fn try_new(
        debtor: impl Into<String>,
        creditor: impl Into<String>,
        amount: Decimal,
    ) -> Result<Self, ObligationError> {
        let debtor = debtor.into();
        let creditor = creditor.into();
        if debtor.is_empty() || creditor.is_empty() {
            return Err(ObligationError::EmptyName);
        }
        if amount <= Decimal::ZERO {
            return Err(ObligationError::NonPositiveAmount(amount));
        }
        if debtor == creditor {
            return Err(ObligationError::SelfObligation(debtor));
        }
        Ok(Self {
            debtor,
            creditor,
            amount,
            memo: None,
        })
    }

    /// Attach a memo.
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    // --- Accessors ---

    pub fn debtor(&self) -> &str {
        &self.debtor
    }

    pub fn creditor(&self) -> &str {
        &self.creditor
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn memo(&self) -> Option<&str> {
        self.memo.as_deref()
    }
}

/// Unvalidated wire form of an [`Obligation`].
#[derive(Deserialize)]
struct RawObligation {
    debtor: String,
    creditor: String,
    amount: Decimal,
    #[serde(default)]
    memo: Option<String>,
}

impl TryFrom<RawObligation> for Obligation {
    type Error = ObligationError;

    fn try_from(raw: RawObligation) -> Result<Self, Self::Error> {
        let ob = Self::try_new(raw.debtor, raw.creditor, raw.amount)?;
        Ok(match raw.memo {
            Some(memo) => ob.with_memo(memo),
            None => ob,
        })
    }
}

/// An ordered collection of obligations, as handed to the settlement engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObligationSet {
    obligations: Vec<Obligation>,
}

impl ObligationSet {
    pub fn new() -> Self {
        Self {
            obligations: Vec::new(),
        }
    }

    pub fn add(&mut self, obligation: Obligation) {
        self.obligations.push(obligation);
    }

    pub fn obligations(&self) -> &[Obligation] {
        &self.obligations
    }

    pub fn len(&self) -> usize {
        self.obligations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obligations.is_empty()
    }

    /// Total gross value of all obligations, or `None` if it does not fit
    /// in a `Decimal`.
    pub fn gross_total(&self) -> Option<Decimal> {
        self.obligations
            .iter()
            .try_fold(Decimal::ZERO, |acc, o| acc.checked_add(o.amount()))
    }

    /// All distinct people mentioned, sorted by name.
    pub fn people(&self) -> Vec<&str> {
        let mut people: Vec<&str> = self
            .obligations
            .iter()
            .flat_map(|o| [o.debtor(), o.creditor()])
            .collect();
        people.sort_unstable();
        people.dedup();
        people
    }
}

impl FromIterator<Obligation> for ObligationSet {
    fn from_iter<T: IntoIterator<Item = Obligation>>(iter: T) -> Self {
        Self {
            obligations: iter.into_iter().collect(),
        }
    }
}

/// A settlement payment derived by the simplifier: `debtor` pays `creditor`.
///
/// Shares the shape of [`Obligation`] but carries no identity; it does not
/// correspond to any one input record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub debtor: String,
    pub creditor: String,
    pub amount: Decimal,
}

impl std::fmt::Display for Payment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} pays {} to {}", self.debtor, self.amount, self.creditor)
    }
}
