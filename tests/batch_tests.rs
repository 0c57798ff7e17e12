use sap_render::backend::{BackendCall, RecordingBackend};
use sap_render::batch::BatchBuffer;
use sap_render::utils::{Color, Rectangle};

fn push_n(batch: &mut BatchBuffer, backend: &mut RecordingBackend, n: usize) {
    for i in 0..n {
        batch
            .push_quad(
                backend,
                Rectangle::new(i as i32, 0, 1, 1),
                Rectangle::new(0, 0, 1, 1),
                Color::WHITE,
            )
            .unwrap();
    }
}

#[test]
fn overflow_flushes_follow_capacity_formula() {
    for cap in [1usize, 3, 7] {
        for n in 1..=4 * cap + 1 {
            let mut backend = RecordingBackend::new();
            let mut batch = BatchBuffer::new(cap, 16, 16);
            push_n(&mut batch, &mut backend, n);

            let overflow_flushes = backend.submissions().count();
            assert_eq!(overflow_flushes, (n - 1) / cap, "cap {} n {}", cap, n);
            assert!(batch.count() >= 1 && batch.count() <= cap);
            assert_eq!(batch.count(), n - overflow_flushes * cap);
        }
    }
}

#[test]
fn every_overflow_submission_is_exactly_full() {
    let mut backend = RecordingBackend::new();
    let mut batch = BatchBuffer::new(5, 16, 16);
    push_n(&mut batch, &mut backend, 12);
    batch.flush(&mut backend).unwrap();

    let counts: Vec<usize> = backend.submissions().map(|s| s.quad_count()).collect();
    assert_eq!(counts, vec![5, 5, 2]);
    assert_eq!(batch.flush_count(), 3);
    assert_eq!(batch.quad_total(), 12);
    assert!(batch.is_empty());
}

#[test]
fn flushed_batch_restarts_indices_at_zero() {
    let mut backend = RecordingBackend::new();
    let mut batch = BatchBuffer::new(2, 16, 16);
    push_n(&mut batch, &mut backend, 3);
    batch.flush(&mut backend).unwrap();

    let submissions: Vec<_> = backend.submissions().collect();
    assert_eq!(submissions[0].indices, vec![0, 1, 2, 2, 3, 1, 4, 5, 6, 6, 7, 5]);
    assert_eq!(submissions[1].indices, vec![0, 1, 2, 2, 3, 1]);
    // The third quad keeps its own destination after the implicit flush.
    assert_eq!(submissions[1].positions[0], [2.0, 0.0]);
}

#[test]
fn submissions_carry_parallel_arrays_of_matching_length() {
    let mut backend = RecordingBackend::new();
    let mut batch = BatchBuffer::new(8, 16, 16);
    push_n(&mut batch, &mut backend, 3);
    batch.flush(&mut backend).unwrap();

    match &backend.calls()[0] {
        BackendCall::Submit(s) => {
            assert_eq!(s.positions.len(), 12);
            assert_eq!(s.tex_coords.len(), 12);
            assert_eq!(s.colors.len(), 12);
            assert_eq!(s.indices.len(), 18);
        }
        other => panic!("unexpected call {:?}", other),
    }
}
