use super::Val;
use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// Index of a slot in the tensor pool. The machine only ever holds
/// handles; the pool owns every descriptor and all backing storage.
pub type Handle = usize;

pub const MAX_RANK: usize = 4;

/// Tensor descriptor: logical shape, row-major strides and a span of
/// the pool's managed store. A transposed view is a second descriptor
/// over the same span with dims and strides swapped.
#[derive(Clone, Debug)]
pub struct Tensor {
    shape: [usize; MAX_RANK],
    stride: [usize; MAX_RANK],
    rank: usize,
    offset: usize,
    numel: usize,
}

impl Tensor {
    fn contiguous(shape: &[usize], offset: usize) -> Tensor {
        debug_assert!(!shape.is_empty() && shape.len() <= MAX_RANK);
        let mut t = Tensor {
            shape: [1; MAX_RANK],
            stride: [1; MAX_RANK],
            rank: shape.len(),
            offset,
            numel: shape.iter().product(),
        };
        t.shape[..t.rank].copy_from_slice(shape);
        let mut step = 1;
        for d in (0..t.rank).rev() {
            t.stride[d] = step;
            step *= t.shape[d];
        }
        t
    }

    pub fn rank(&self) -> usize {
        self.rank
    }
    pub fn shape(&self) -> &[usize] {
        &self.shape[..self.rank]
    }
    pub fn numel(&self) -> usize {
        self.numel
    }
    pub fn rows(&self) -> usize {
        self.shape[self.rank - 2]
    }
    pub fn cols(&self) -> usize {
        self.shape[self.rank - 1]
    }

    /// Store index for a row-major logical index.
    fn index(&self, logical: usize) -> usize {
        let mut rem = logical;
        let mut at = self.offset;
        for d in (0..self.rank).rev() {
            at += (rem % self.shape[d]) * self.stride[d];
            rem /= self.shape[d];
        }
        at
    }

    fn at2(&self, r: usize, c: usize) -> usize {
        self.offset + r * self.stride[self.rank - 2] + c * self.stride[self.rank - 1]
    }
}

/// ## Tensor storage pool
///
/// One managed `f32` store with a fixed element capacity plus a slot
/// table of descriptors. Allocation is a bump into the store; `free`
/// releases the slot index for reuse but storage itself lives for the
/// session, which is what keeps weakly held handles and views safe.

pub struct TensorPool {
    capacity: usize,
    store: Vec<f32>,
    slots: Vec<Option<Tensor>>,
}

impl TensorPool {
    pub fn new(capacity: usize) -> TensorPool {
        TensorPool {
            capacity,
            store: Vec::new(),
            slots: Vec::new(),
        }
    }

    pub fn allocate(&mut self, shape: &[usize]) -> Result<Handle> {
        if shape.is_empty() || shape.len() > MAX_RANK || shape.iter().any(|d| *d == 0) {
            return Err(error!(ShapeMismatch; "BAD SHAPE"));
        }
        let tensor = Tensor::contiguous(shape, self.store.len());
        if self.store.len() + tensor.numel > self.capacity {
            return Err(error!(OutOfMemory; "TENSOR STORE FULL"));
        }
        self.store.resize(self.store.len() + tensor.numel, 0.0);
        Ok(self.insert(tensor))
    }

    pub fn free(&mut self, handle: Handle) {
        if let Some(slot) = self.slots.get_mut(handle) {
            *slot = None;
        }
    }

    /// Element count must be unchanged; the descriptor is rebuilt
    /// contiguous over the same span.
    pub fn reshape(&mut self, handle: Handle, shape: &[usize]) -> Result<()> {
        let tensor = self.get(handle)?.clone();
        if shape.iter().product::<usize>() != tensor.numel {
            return Err(error!(ShapeMismatch; "RESHAPE ELEMENT COUNT"));
        }
        self.slots[handle] = Some(Tensor::contiguous(shape, tensor.offset));
        Ok(())
    }

    pub fn get(&self, handle: Handle) -> Result<&Tensor> {
        match self.slots.get(handle) {
            Some(Some(tensor)) => Ok(tensor),
            _ => Err(error!(InternalError; "BAD TENSOR HANDLE")),
        }
    }

    /// Logical-order copy, honoring strides.
    pub fn read(&self, handle: Handle) -> Result<Vec<f32>> {
        let tensor = self.get(handle)?;
        Ok((0..tensor.numel)
            .map(|i| self.store[tensor.index(i)])
            .collect())
    }

    /// Logical-order write, honoring strides.
    pub fn write(&mut self, handle: Handle, data: &[f32]) -> Result<()> {
        let tensor = self.get(handle)?.clone();
        debug_assert_eq!(data.len(), tensor.numel);
        for (i, v) in data.iter().enumerate() {
            self.store[tensor.index(i)] = *v;
        }
        Ok(())
    }

    fn insert(&mut self, tensor: Tensor) -> Handle {
        for (h, slot) in self.slots.iter_mut().enumerate() {
            if slot.is_none() {
                *slot = Some(tensor);
                return h;
            }
        }
        self.slots.push(Some(tensor));
        self.slots.len() - 1
    }
}

#[derive(Clone, Copy)]
pub enum Ew {
    Add,
    Sub,
    Mul,
    Div,
}

impl Ew {
    pub fn apply(self, a: f32, b: f32) -> f32 {
        match self {
            Ew::Add => a + b,
            Ew::Sub => a - b,
            Ew::Mul => a * b,
            Ew::Div => a / b,
        }
    }
}

/// Element-wise kernel over two tensors of identical shape. Each
/// output element depends only on the matching input elements, so the
/// loop is free to run with any internal parallelism.
pub fn ewise(pool: &mut TensorPool, op: Ew, a: Handle, b: Handle) -> Result<Handle> {
    let (ta, tb) = (pool.get(a)?.clone(), pool.get(b)?.clone());
    if ta.shape() != tb.shape() {
        return Err(error!(ShapeMismatch));
    }
    let (da, db) = (pool.read(a)?, pool.read(b)?);
    let out: Vec<f32> = da
        .iter()
        .zip(db.iter())
        .map(|(x, y)| op.apply(*x, *y))
        .collect();
    let result = pool.allocate(ta.shape())?;
    pool.write(result, &out)?;
    Ok(result)
}

/// Element-wise kernel between a tensor and a scalar; the scalar is
/// applied to every element on the side it appeared on the stack.
pub fn ewise_scalar(
    pool: &mut TensorPool,
    op: Ew,
    a: Handle,
    scalar: f32,
    scalar_on_left: bool,
) -> Result<Handle> {
    let ta = pool.get(a)?.clone();
    let da = pool.read(a)?;
    let out: Vec<f32> = da
        .iter()
        .map(|x| {
            if scalar_on_left {
                op.apply(scalar, *x)
            } else {
                op.apply(*x, scalar)
            }
        })
        .collect();
    let result = pool.allocate(ta.shape())?;
    pool.write(result, &out)?;
    Ok(result)
}

/// Element-wise exponential.
pub fn exp(pool: &mut TensorPool, a: Handle) -> Result<Handle> {
    let ta = pool.get(a)?.clone();
    let out: Vec<f32> = pool.read(a)?.iter().map(|x| x.exp()).collect();
    let result = pool.allocate(ta.shape())?;
    pool.write(result, &out)?;
    Ok(result)
}

/// Rank-2 matrix product `(m,k) x (k,n) -> (m,n)`.
pub fn matmul(pool: &mut TensorPool, a: Handle, b: Handle) -> Result<Handle> {
    let (ta, tb) = (pool.get(a)?.clone(), pool.get(b)?.clone());
    if ta.rank() != 2 || tb.rank() != 2 || ta.cols() != tb.rows() {
        return Err(error!(ShapeMismatch; "MATMUL"));
    }
    let (m, k, n) = (ta.rows(), ta.cols(), tb.cols());
    let mut out = vec![0.0; m * n];
    for r in 0..m {
        for c in 0..n {
            let mut acc = 0.0;
            for x in 0..k {
                acc += pool.store[ta.at2(r, x)] * pool.store[tb.at2(x, c)];
            }
            out[r * n + c] = acc;
        }
    }
    let result = pool.allocate(&[m, n])?;
    pool.write(result, &out)?;
    Ok(result)
}

/// GEMM: `C <- alpha * (A x B) + beta * C`, in place on C. The
/// destination may not alias either input within one launch.
pub fn gemm(
    pool: &mut TensorPool,
    alpha: f32,
    beta: f32,
    a: Handle,
    b: Handle,
    c: Handle,
) -> Result<()> {
    if a == c || b == c {
        return Err(error!(InternalError; "GEMM DESTINATION ALIASES INPUT"));
    }
    let (ta, tb, tc) = (
        pool.get(a)?.clone(),
        pool.get(b)?.clone(),
        pool.get(c)?.clone(),
    );
    if ta.rank() != 2 || tb.rank() != 2 || tc.rank() != 2 {
        return Err(error!(ShapeMismatch; "GEMM RANK"));
    }
    let (m, k, n) = (ta.rows(), ta.cols(), tb.cols());
    if tb.rows() != k || tc.rows() != m || tc.cols() != n {
        return Err(error!(ShapeMismatch; "GEMM"));
    }
    let mut out = vec![0.0; m * n];
    for r in 0..m {
        for c2 in 0..n {
            let mut acc = 0.0;
            for x in 0..k {
                acc += pool.store[ta.at2(r, x)] * pool.store[tb.at2(x, c2)];
            }
            out[r * n + c2] = alpha * acc + beta * pool.store[tc.at2(r, c2)];
        }
    }
    pool.write(c, &out)
}

/// Swap the last two logical dimensions and strides. No data moves;
/// the result is a view over the same storage span.
pub fn transpose(pool: &mut TensorPool, a: Handle) -> Result<Handle> {
    let mut tensor = pool.get(a)?.clone();
    if tensor.rank() < 2 {
        return Err(error!(ShapeMismatch; "TRANSPOSE RANK"));
    }
    let r = tensor.rank;
    tensor.shape.swap(r - 2, r - 1);
    tensor.stride.swap(r - 2, r - 1);
    Ok(pool.insert(tensor))
}

/// Declared extension point; no algorithm is implemented.
pub fn inverse(_pool: &mut TensorPool, _a: Handle) -> Result<Handle> {
    Err(error!(InternalError; "INVERSE NOT IMPLEMENTED"))
}

/// Render a tensor in the same bracketed form the reader accepts.
pub fn format(pool: &TensorPool, handle: Handle) -> Result<String> {
    let tensor = pool.get(handle)?;
    let data = pool.read(handle)?;
    fn group(shape: &[usize], data: &[f32]) -> String {
        if shape.len() == 1 {
            let cells: Vec<String> = data.iter().map(|v| Val::Scalar(*v).to_string()).collect();
            format!("[{}]", cells.join(" "))
        } else {
            let chunk = data.len() / shape[0];
            let rows: Vec<String> = data
                .chunks(chunk)
                .map(|part| group(&shape[1..], part))
                .collect();
            format!("[{}]", rows.join(" "))
        }
    }
    Ok(group(tensor.shape(), &data))
}

/// ## Bracketed tensor literals
///
/// `[ [ 1 2 ] [ 3 4 ] ]` entered at the input accumulates scalars
/// across tokens under a nesting level counter and commits one pooled
/// tensor when the outermost bracket closes. Every depth must hold
/// either scalars or sub-brackets, never both, and sibling groups must
/// agree on size.

pub struct TensorReader {
    level: usize,
    depth: usize,
    data: Vec<f32>,
    extent: [usize; MAX_RANK + 1],
    count: [usize; MAX_RANK + 1],
    kind: [Item; MAX_RANK + 1],
}

#[derive(Clone, Copy, PartialEq)]
enum Item {
    Unset,
    Scalar,
    List,
}

impl TensorReader {
    pub fn new() -> TensorReader {
        TensorReader {
            level: 0,
            depth: 0,
            data: Vec::new(),
            extent: [0; MAX_RANK + 1],
            count: [0; MAX_RANK + 1],
            kind: [Item::Unset; MAX_RANK + 1],
        }
    }

    pub fn is_open(&self) -> bool {
        self.level > 0
    }

    pub fn reset(&mut self) {
        *self = TensorReader::new();
    }

    pub fn open(&mut self) -> Result<()> {
        if self.level == MAX_RANK {
            return Err(error!(ShapeMismatch; "RANK LIMIT"));
        }
        if self.level > 0 {
            self.item(self.level, Item::List)?;
        }
        self.level += 1;
        self.count[self.level] = 0;
        if self.level > self.depth {
            self.depth = self.level;
        }
        Ok(())
    }

    pub fn scalar(&mut self, value: f32) -> Result<()> {
        debug_assert!(self.level > 0);
        self.item(self.level, Item::Scalar)?;
        self.data.push(value);
        Ok(())
    }

    /// Close one bracket. Returns the committed handle when the
    /// outermost bracket closes.
    pub fn close(&mut self, pool: &mut TensorPool) -> Result<Option<Handle>> {
        if self.level == 0 {
            return Err(error!(UnmatchedBranch, "]"));
        }
        if self.count[self.level] == 0 {
            return Err(error!(ShapeMismatch; "EMPTY BRACKET"));
        }
        if self.extent[self.level] == 0 {
            self.extent[self.level] = self.count[self.level];
        } else if self.extent[self.level] != self.count[self.level] {
            return Err(error!(ShapeMismatch; "RAGGED LITERAL"));
        }
        self.level -= 1;
        if self.level > 0 {
            return Ok(None);
        }
        let shape: Vec<usize> = self.extent[1..=self.depth].to_vec();
        debug_assert_eq!(shape.iter().product::<usize>(), self.data.len());
        let handle = pool.allocate(&shape)?;
        pool.write(handle, &self.data)?;
        self.reset();
        Ok(Some(handle))
    }

    fn item(&mut self, depth: usize, kind: Item) -> Result<()> {
        if self.kind[depth] == Item::Unset {
            self.kind[depth] = kind;
        } else if self.kind[depth] != kind {
            return Err(error!(ShapeMismatch; "MIXED NESTING"));
        }
        self.count[depth] += 1;
        Ok(())
    }
}
