//! Node-level integration: bootstrap, ingest, buffering, admission and
//! restart replay.

use slate_node::{AdmissionError, NodeConfig, NodeError, SlateNode};
use slate_transactions::{Block, Output, OutputId, Transaction};
use slate_types::{
    crypto, Address, BlockHash, DelegateId, DelegateNum, KeyPair, ShareAmount, Timestamp, TxHash,
};

fn addr(n: u32) -> Address {
    Address::new(format!("slt_{n:08x}"))
}

fn d(n: u32) -> DelegateNum {
    DelegateNum::new(n)
}

fn payment(owner: u32, amount: u64) -> Output {
    Output::Payment {
        owner: addr(owner),
        amount: ShareAmount::new(amount),
    }
}

fn config_for(dir: &tempfile::TempDir) -> NodeConfig {
    NodeConfig {
        data_dir: dir.path().to_path_buf(),
        ..NodeConfig::default()
    }
}

/// Genesis: register delegate 1 with its signing key, issue a small and a
/// large output (supply 1,000,000 → vote cap 20,000).
fn genesis(kp: &KeyPair) -> (Block, OutputId, OutputId) {
    let gtx = Transaction::new(
        vec![],
        vec![
            Output::ClaimName {
                delegate_id: Some(d(1)),
                name: "producer".into(),
                data: kp.public.as_bytes().to_vec(),
            },
            payment(0, 15_000),
            payment(0, 985_000),
        ],
        DelegateId::NONE,
        Timestamp::new(0),
    );
    let small = OutputId::new(gtx.hash, 1);
    let large = OutputId::new(gtx.hash, 2);
    let block = Block::new(1, BlockHash::ZERO, Timestamp::new(10), d(1), vec![gtx]);
    (block, small, large)
}

/// A signed rank-0 block (timestamp on a multiple of 1000).
fn next_block(node: &SlateNode, kp: &KeyPair, txs: Vec<Transaction>) -> Block {
    let snapshot = node.service().snapshot();
    let ts = (snapshot.height() + 1) * 1_000;
    let mut block = Block::new(
        snapshot.height() + 1,
        snapshot.tip(),
        Timestamp::new(ts),
        d(1),
        txs,
    );
    block.sign(&kp.private);
    block
}

#[test]
fn bootstrap_ingest_and_restart_replay() {
    let dir = tempfile::tempdir().unwrap();
    let kp = crypto::keypair_from_seed(&[3; 32]);
    let (genesis_block, small, _large) = genesis(&kp);

    let tip_after;
    {
        let node = SlateNode::open(config_for(&dir)).unwrap();
        node.bootstrap(&genesis_block).unwrap();

        // Vote 14,000 for delegate 1, burning a 1,000 fee.
        let tx = Transaction::new(
            vec![small],
            vec![payment(0, 14_000)],
            DelegateId::for_delegate(d(1)),
            Timestamp::new(0),
        );
        let block = next_block(&node, &kp, vec![tx]);
        let arrival = block.timestamp;
        let receipt = node.handle_block(block, arrival).unwrap().unwrap();
        assert_eq!(receipt.height, 2);
        assert_eq!(receipt.revenue, 1_000);

        let snapshot = node.service().snapshot();
        assert_eq!(snapshot.net_votes(d(1)), 14_000);
        tip_after = snapshot.tip();
        node.shutdown().unwrap();
    }

    // A fresh node over the same directory replays to the same state.
    let node = SlateNode::open(config_for(&dir)).unwrap();
    let snapshot = node.service().snapshot();
    assert_eq!(snapshot.height(), 2);
    assert_eq!(snapshot.tip(), tip_after);
    assert_eq!(snapshot.net_votes(d(1)), 14_000);

    // Observations were restored too.
    let observer = node.service().observer_snapshot();
    assert_eq!(observer.observation(d(1)).unwrap().produced, 1);
}

#[test]
fn future_blocks_buffer_until_their_slot() {
    let dir = tempfile::tempdir().unwrap();
    let kp = crypto::keypair_from_seed(&[3; 32]);
    let (genesis_block, _small, large) = genesis(&kp);

    let node = SlateNode::open(config_for(&dir)).unwrap();
    node.bootstrap(&genesis_block).unwrap();

    let tx = Transaction::new(
        vec![large],
        vec![payment(0, 985_000)],
        DelegateId::NONE,
        Timestamp::new(0),
    );
    let block = next_block(&node, &kp, vec![tx]);
    let slot_time = block.timestamp;

    // Arrives early: buffered, chain unchanged.
    let early = Timestamp::new(slot_time.as_secs() - 50);
    assert!(node.handle_block(block, early).unwrap().is_none());
    assert_eq!(node.service().snapshot().height(), 1);

    // Once the slot begins, draining applies it.
    node.drain_ingest(slot_time);
    assert_eq!(node.service().snapshot().height(), 2);
}

#[test]
fn stale_blocks_are_discarded() {
    let dir = tempfile::tempdir().unwrap();
    let kp = crypto::keypair_from_seed(&[3; 32]);
    let (genesis_block, _small, large) = genesis(&kp);

    let node = SlateNode::open(config_for(&dir)).unwrap();
    node.bootstrap(&genesis_block).unwrap();

    let tx = Transaction::new(
        vec![large],
        vec![payment(0, 985_000)],
        DelegateId::NONE,
        Timestamp::new(0),
    );
    let block = next_block(&node, &kp, vec![tx]);
    let slot_time = block.timestamp.as_secs();

    // More than one round (1000s) after its slot: discarded.
    let late = Timestamp::new(slot_time + 1_010);
    let err = node.handle_block(block, late).unwrap_err();
    assert!(matches!(err, NodeError::StaleBlock));
}

#[test]
fn admission_errors_are_recoverable() {
    let dir = tempfile::tempdir().unwrap();
    let kp = crypto::keypair_from_seed(&[3; 32]);
    let (genesis_block, small, _large) = genesis(&kp);

    let node = SlateNode::open(config_for(&dir)).unwrap();
    node.bootstrap(&genesis_block).unwrap();

    let good = Transaction::new(
        vec![small],
        vec![payment(0, 14_000)],
        DelegateId::NONE,
        Timestamp::new(0),
    );
    node.submit_transaction(good).unwrap();

    // Same input again: pending conflict, recoverable.
    let conflict = Transaction::new(
        vec![small],
        vec![payment(0, 13_000)],
        DelegateId::NONE,
        Timestamp::new(1),
    );
    assert!(matches!(
        node.submit_transaction(conflict).unwrap_err(),
        AdmissionError::InputPending(_)
    ));

    // Unknown input: recoverable.
    let unknown = Transaction::new(
        vec![OutputId::new(TxHash::new([0xAA; 32]), 0)],
        vec![payment(0, 10)],
        DelegateId::NONE,
        Timestamp::new(2),
    );
    assert!(matches!(
        node.submit_transaction(unknown).unwrap_err(),
        AdmissionError::UnknownInput(_)
    ));

    // The pending transaction lands in the next produced block.
    let packed = node.service().pending_for_block(16);
    assert_eq!(packed.len(), 1);
    let block = next_block(&node, &kp, packed);
    let arrival = block.timestamp;
    node.handle_block(block, arrival).unwrap().unwrap();
    assert_eq!(node.service().mempool_len(), 0);
}
