use matlayout::sparse::{keep_all, non_zero};
use matlayout::{
    DenseMatrix, DynamicMatrix, Registered, RowMajorMatrix, SparseMatrix, StackMatrix,
    StorageError, ZeroMatrix,
};

#[test]
fn nested_rows_construction() {
    let m = DenseMatrix::<f64>::from_rows(&[[2.0, 3.0], [-4.0, 1.0], [7.0, -1.0]]).unwrap();
    assert_eq!(m.size(), 6);
    assert_eq!(m[(0, 0)], 2.0);
    assert_eq!(m[(2, 1)], -1.0);
}

#[test]
fn registry_indices_are_pinned() {
    assert_eq!(<DenseMatrix<f64> as Registered>::TYPE_INDEX, 6);
    assert_eq!(<DenseMatrix<f32> as Registered>::TYPE_INDEX, 2);

    let a = DynamicMatrix::new(DenseMatrix::<f64>::zeros(3, 3).unwrap());
    let b = DynamicMatrix::new(DenseMatrix::<f32>::zeros(3, 3).unwrap());
    assert_eq!(a.type_index(), 6);
    assert_eq!(b.type_index(), 2);
    assert_eq!(matlayout::pair_index(a.type_index(), b.type_index()), 50);
}

#[test]
fn external_memory_is_never_reallocated() {
    let mut backing = vec![1.0_f64, 2.0, 3.0, 4.0];
    let ptr = backing.as_mut_ptr();
    let mut m = unsafe { DenseMatrix::<f64>::from_raw_parts(2, 2, ptr) }.unwrap();

    assert_eq!(m.resize(3, 3), Err(StorageError::NotOwned));
    assert_eq!((m.nrows(), m.ncols()), (2, 2));
    assert_eq!(m.as_ptr(), ptr as *const f64);
    assert_eq!(m[(1, 1)], 4.0);

    m[(0, 1)] = 30.0;
    drop(m);
    assert_eq!(backing, vec![1.0, 2.0, 30.0, 4.0]);
}

#[test]
fn moved_from_matrix_is_empty() {
    let mut a = DenseMatrix::<f64>::from_fn(4, 4, |r, c| (r + c) as f64).unwrap();
    let b = a.take();
    assert_eq!(a.len(), 0);
    drop(a);
    assert_eq!(b.size(), 16);
    assert_eq!(b[(3, 3)], 6.0);
}

#[test]
fn view_edits_show_in_parent() {
    let mut m = RowMajorMatrix::<i32>::from_fn(5, 5, |r, c| (r * 5 + c) as i32).unwrap();
    {
        let mut v = m.sub_matrix_mut(3, 2, 1, 2).unwrap();
        for x in v.iter_mut() {
            *x = -*x;
        }
    }
    assert_eq!(m[(1, 2)], -7);
    assert_eq!(m[(3, 3)], -18);
    assert_eq!(m[(3, 4)], 19);
    assert_eq!(m[(0, 2)], 2);
}

#[test]
fn dense_sparse_dense_round_trips() {
    let d = DenseMatrix::<f64>::from_rows(&[[0.0, 1.5, 0.0], [2.0, 0.0, -3.0]]).unwrap();

    let csc = SparseMatrix::<f64>::from_dense(&d, non_zero).unwrap();
    assert_eq!(csc.nnz(), 3);
    assert_eq!(DenseMatrix::<f64>::from_sparse(&csc).unwrap(), d);

    let csr = matlayout::CsrMatrix::<f64>::from_dense(&d, keep_all).unwrap();
    assert_eq!(csr.nnz(), 6);
    let back = RowMajorMatrix::<f64>::from_sparse(&csr).unwrap();
    assert!(back.equal_by(&d, |a, b| a == b));
}

#[test]
fn dispatch_through_erased_matrices() {
    let ones = StackMatrix::<f64, 2, 2>::from_element(2, 2, 1.0).unwrap();
    let mats = vec![
        DynamicMatrix::new(ZeroMatrix::<f32>::new(2, 2).unwrap()),
        DynamicMatrix::new(DenseMatrix::<f64>::from_dense(&ones).unwrap()),
        DynamicMatrix::new(SparseMatrix::<f64>::zeros(2, 2).unwrap()),
    ];
    let names: Vec<_> = mats.iter().map(|m| m.type_name()).collect();
    assert_eq!(
        names,
        ["Matrix<Zero,float>", "Matrix<Dense,double>", "Matrix<Sparse,double>"]
    );
    let sums: Vec<f64> = mats
        .iter()
        .map(|m| DenseMatrix::<f64>::from_dynamic(m).unwrap().iter().sum())
        .collect();
    assert_eq!(sums, [0.0, 4.0, 0.0]);

    let thresholded = SparseMatrix::<f64>::from_dynamic(&mats[1], 0.5).unwrap();
    assert_eq!(thresholded.nnz(), 4);
    assert_eq!(SparseMatrix::<f64>::from_dynamic(&mats[1], 2.0).unwrap().nnz(), 0);
}
