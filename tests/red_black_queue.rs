use std::sync::Arc;
use std::thread;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use redblack_tree::red_black_queue::DEFAULT_PRIORITY;
use redblack_tree::{RedBlackError, RedBlackQueue};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Items come out sorted by priority, and in enqueue order within a priority.
    #[test]
    fn dequeue_order_is_stable_priority_order(priorities in proptest::collection::vec(any::<u8>(), 0..500)) {
        let queue = RedBlackQueue::new();
        for (index, &priority) in priorities.iter().enumerate() {
            queue.enqueue_with_priority(index, priority);
        }

        let mut expected: Vec<usize> = (0..priorities.len()).collect();
        expected.sort_by_key(|&index| priorities[index]);
        prop_assert_eq!(queue.to_vec(), expected.clone());

        let mut drained = Vec::new();
        while let Ok(item) = queue.dequeue() {
            drained.push(item);
        }
        prop_assert_eq!(drained, expected);
        prop_assert!(queue.is_empty());
    }
}

#[test]
fn default_priority_is_fifo() {
    let queue = RedBlackQueue::new();
    assert_eq!(queue.default_priority(), DEFAULT_PRIORITY);
    for word in ["alpha", "beta", "gamma"] {
        queue.enqueue(word);
    }
    queue.enqueue_with_priority("urgent", DEFAULT_PRIORITY - 1);
    queue.enqueue_with_priority("later", DEFAULT_PRIORITY + 1);

    assert_eq!(queue.len(), 5);
    assert_eq!(queue.peek(), Ok("urgent"));
    let drained: Vec<_> = std::iter::from_fn(|| queue.dequeue().ok()).collect();
    assert_eq!(drained, ["urgent", "alpha", "beta", "gamma", "later"]);
    assert_eq!(queue.dequeue(), Err(RedBlackError::EmptyTree));
}

#[test]
fn items_enqueued_after_dequeue_keep_fifo_order() {
    let queue = RedBlackQueue::with_default_priority(7);
    queue.enqueue(1);
    queue.enqueue(2);
    assert_eq!(queue.dequeue(), Ok(1));
    queue.enqueue(3);
    assert_eq!(queue.to_vec(), [2, 3]);
}

#[test]
fn concurrent_producers_lose_nothing() {
    const PRODUCERS: usize = 8;
    const ITEMS: usize = 500;

    let queue = Arc::new(RedBlackQueue::new());
    let handles: Vec<_> = (0..PRODUCERS)
        .map(|producer| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                for item in 0..ITEMS {
                    let priority = u8::try_from(producer).unwrap();
                    queue.enqueue_with_priority((producer, item), priority);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(queue.len(), PRODUCERS * ITEMS);
    let drained: Vec<(usize, usize)> = std::iter::from_fn(|| queue.dequeue().ok()).collect();
    let expected: Vec<(usize, usize)> = (0..PRODUCERS)
        .flat_map(|producer| (0..ITEMS).map(move |item| (producer, item)))
        .collect();
    assert_eq!(drained, expected);
}

#[test]
fn concurrent_producers_and_consumers() {
    const ITEMS: u32 = 2_000;

    let queue = Arc::new(RedBlackQueue::new());
    let producer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || {
            for item in 0..ITEMS {
                queue.enqueue(item);
            }
        })
    };
    let consumer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || {
            let mut seen = Vec::new();
            while seen.len() < ITEMS as usize {
                match queue.dequeue() {
                    Ok(item) => seen.push(item),
                    Err(_) => thread::yield_now(),
                }
            }
            seen
        })
    };

    producer.join().unwrap();
    let seen = consumer.join().unwrap();
    assert_eq!(seen, (0..ITEMS).collect::<Vec<_>>());
    assert!(queue.is_empty());
}
