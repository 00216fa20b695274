use TrafficLightMini::core::queue::{MessageQueue, SharedQueue};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

#[test]
fn test_sequential_sends_are_received_in_fifo_order() {
    let queue = MessageQueue::new();
    for i in 1..=5 {
        queue.send(i);
    }
    assert_eq!(queue.len(), 5);

    let received: Vec<i32> = (0..5).map(|_| queue.receive()).collect();
    assert_eq!(received, vec![1, 2, 3, 4, 5]);
    assert!(queue.is_empty());
}

#[test]
fn test_interleaved_send_receive_keeps_order() {
    let queue = MessageQueue::new();
    queue.send("a");
    queue.send("b");
    assert_eq!(queue.receive(), "a");
    queue.send("c");
    assert_eq!(queue.receive(), "b");
    assert_eq!(queue.receive(), "c");
}

#[test]
fn test_receive_blocks_until_send() {
    let queue: SharedQueue<u64> = Arc::new(MessageQueue::new());
    let done = Arc::new(AtomicBool::new(false));

    let consumer = {
        let queue = Arc::clone(&queue);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let value = queue.receive();
            done.store(true, Ordering::SeqCst);
            value
        })
    };

    thread::sleep(Duration::from_millis(100));
    assert!(!done.load(Ordering::SeqCst), "receive returned on an empty queue");

    queue.send(42);
    assert_eq!(consumer.join().unwrap(), 42);
    assert!(done.load(Ordering::SeqCst));
}

#[test]
fn test_single_producer_order_seen_by_single_consumer() {
    let queue: SharedQueue<u32> = Arc::new(MessageQueue::new());
    let producer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || {
            for i in 0..10_000 {
                queue.send(i);
            }
        })
    };

    let received: Vec<u32> = (0..10_000).map(|_| queue.receive()).collect();
    producer.join().unwrap();
    assert!(received.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_no_lost_or_duplicated_values_under_contention() {
    const PRODUCERS: usize = 4;
    const CONSUMERS: usize = 4;
    const PER_PRODUCER: usize = 2_500;
    const PER_CONSUMER: usize = PRODUCERS * PER_PRODUCER / CONSUMERS;

    for _run in 0..10 {
        let queue: SharedQueue<usize> = Arc::new(MessageQueue::new());

        // consumers start first so most of them are parked when sends arrive
        let consumers: Vec<_> = (0..CONSUMERS)
            .map(|_| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || (0..PER_CONSUMER).map(|_| queue.receive()).collect::<Vec<_>>())
            })
            .collect();

        let producers: Vec<_> = (0..PRODUCERS)
            .map(|p| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    for i in 0..PER_PRODUCER {
                        queue.send(p * PER_PRODUCER + i);
                    }
                })
            })
            .collect();

        for handle in producers {
            handle.join().unwrap();
        }

        let mut seen = HashSet::new();
        let mut total = 0;
        for handle in consumers {
            for value in handle.join().unwrap() {
                assert!(seen.insert(value), "value {value} delivered twice");
                total += 1;
            }
        }
        assert_eq!(total, PRODUCERS * PER_PRODUCER);
        assert_eq!(seen.len(), PRODUCERS * PER_PRODUCER);
        assert!(queue.is_empty());
    }
}
