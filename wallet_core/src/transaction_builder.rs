//! Assemble signed payment transactions from selected inputs.

use slate_transactions::{Output, OutputId, Transaction, UnspentOutput};
use slate_types::{crypto, Address, DelegateId, PrivateKey, ShareAmount, Timestamp};

/// Build a signed payment: `amount` to `recipient`, change minus `fee`
/// back to `change_owner`, all outputs voting with `vote`.
///
/// The caller guarantees the inputs cover `amount + fee`; the selector's
/// job, not the builder's.
pub fn build_payment(
    inputs: Vec<(OutputId, UnspentOutput)>,
    recipient: &Address,
    amount: u64,
    fee: u64,
    change_owner: &Address,
    vote: DelegateId,
    key: &PrivateKey,
    timestamp: Timestamp,
) -> Transaction {
    let total: u64 = inputs.iter().map(|(_, o)| o.amount.raw()).sum();
    let change = total - amount - fee;

    let mut outputs = vec![Output::Payment {
        owner: recipient.clone(),
        amount: ShareAmount::new(amount),
    }];
    if change > 0 {
        outputs.push(Output::Payment {
            owner: change_owner.clone(),
            amount: ShareAmount::new(change),
        });
    }

    let input_ids = inputs.into_iter().map(|(id, _)| id).collect();
    let mut tx = Transaction::new(input_ids, outputs, vote, timestamp);
    tx.signature = crypto::sign(key, &tx.signing_digest());
    tx
}
