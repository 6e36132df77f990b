use evcollect::Collect::Buffer::ConcurrentVec;

fn push(vec: &ConcurrentVec<u64>, value: u64) {
    let slot = vec.prepare_next(1);
    unsafe { slot.write(value) };
    vec.commit_next(1);
}

#[test]
fn fresh_buffer_is_empty() {
    let vec: ConcurrentVec<u64> = ConcurrentVec::new(8);
    assert_eq!(vec.len(), 0);
    assert!(vec.is_empty());
    assert_eq!(vec.capacity(), 8);
    assert_eq!(vec.reserved(), 0);
    assert!(!vec.is_growing());
}

#[test]
#[should_panic]
fn zero_capacity_panics() {
    let _vec: ConcurrentVec<u64> = ConcurrentVec::new(0);
}

#[test]
fn sequential_appends_with_one_growth() {
    // Five appends into a capacity-4 buffer: exactly one reallocation.
    let vec: ConcurrentVec<u64> = ConcurrentVec::new(4);
    for i in 0..5u64 {
        push(&vec, 0xA0 + i);
    }

    assert_eq!(vec.len(), 5);
    assert!(vec.capacity() >= 5);
    let contents = unsafe { vec.as_slice() };
    for (i, value) in contents.iter().enumerate() {
        assert_eq!(*value, 0xA0 + i as u64);
    }
}

#[test]
fn front_back_and_indexing() {
    let vec: ConcurrentVec<u64> = ConcurrentVec::new(8);
    for i in 0..5u64 {
        push(&vec, 10 * i);
    }

    unsafe {
        assert_eq!(*vec.front(), 0);
        assert_eq!(*vec.back(), 40);
        assert_eq!(*vec.get(2), 20);
    }
}

#[test]
#[should_panic]
fn front_on_empty_panics() {
    let vec: ConcurrentVec<u64> = ConcurrentVec::new(4);
    let _ = unsafe { vec.front() };
}

#[test]
#[should_panic]
fn back_on_empty_panics() {
    let vec: ConcurrentVec<u64> = ConcurrentVec::new(4);
    let _ = unsafe { vec.back() };
}

#[test]
fn clear_keeps_capacity_and_resets_cursors() {
    let vec: ConcurrentVec<u64> = ConcurrentVec::new(4);
    for i in 0..7u64 {
        push(&vec, i);
    }
    let grown = vec.capacity();
    assert!(grown >= 7);

    vec.clear();
    assert_eq!(vec.len(), 0);
    assert!(vec.is_empty());
    assert_eq!(vec.reserved(), 0);
    assert_eq!(vec.capacity(), grown);

    // The next reservation starts over at index 0.
    let slot = vec.prepare_next(1);
    assert_eq!(slot, vec.data());
    unsafe { slot.write(99) };
    vec.commit_next(1);
    assert_eq!(unsafe { *vec.get(0) }, 99);
}

#[test]
fn drain_visits_in_index_order_then_empties() {
    let vec: ConcurrentVec<u64> = ConcurrentVec::new(4);
    for i in 0..10u64 {
        push(&vec, i * i);
    }

    let mut seen = Vec::new();
    vec.drain(|value| seen.push(*value));

    assert_eq!(seen, (0..10u64).map(|i| i * i).collect::<Vec<_>>());
    assert!(vec.is_empty());
    assert_eq!(vec.reserved(), 0);

    // Drained buffer accepts appends from index 0 again.
    let slot = vec.prepare_next(1);
    assert_eq!(slot, vec.data());
    unsafe { slot.write(7) };
    vec.commit_next(1);
    assert_eq!(vec.len(), 1);
}

#[test]
fn drain_on_empty_buffer_visits_nothing() {
    let vec: ConcurrentVec<u64> = ConcurrentVec::new(4);
    let mut visits = 0;
    vec.drain(|_| visits += 1);
    assert_eq!(visits, 0);
}

#[test]
fn batch_reservation_is_contiguous() {
    let vec: ConcurrentVec<u64> = ConcurrentVec::new(16);
    let base = vec.prepare_next(4);
    for i in 0..4u64 {
        unsafe { base.add(i as usize).write(100 + i) };
    }
    vec.commit_next(4);

    assert_eq!(vec.len(), 4);
    assert_eq!(unsafe { vec.as_slice() }, &[100, 101, 102, 103]);
}

#[test]
fn debug_output_shows_cursors() {
    let vec: ConcurrentVec<u64> = ConcurrentVec::new(4);
    push(&vec, 1);
    let repr = format!("{:?}", vec);
    assert!(repr.contains("ConcurrentVec"));
    assert!(repr.contains("len: 1"));
    assert!(repr.contains("capacity: 4"));
}
