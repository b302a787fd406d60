use super::tensor::{Handle, TensorPool};
use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// ## Labeled batch loading
///
/// Copies one raw batch from a corpus into pooled tensors: image bytes
/// are normalized per element as `(v - mean*256) / (std*256)` into an
/// `[n,h,w,c]` tensor, labels are narrowed to small integers in an
/// `[n]` tensor. The machine sees both only as handles.

pub struct Dataset {
    pub data: Handle,
    pub labels: Handle,
    pub batch: usize,
}

impl Dataset {
    pub fn load_batch(
        pool: &mut TensorPool,
        shape: [usize; 4],
        raw_data: &[u8],
        raw_labels: &[u8],
        mean: f32,
        std: f32,
    ) -> Result<Dataset> {
        let [n, h, w, c] = shape;
        let numel = n * h * w * c;
        if raw_data.len() != numel || raw_labels.len() != n {
            return Err(error!(ShapeMismatch; "BATCH SIZE"));
        }
        let m = mean * 256.0;
        let s = std * 256.0;
        let normalized: Vec<f32> = raw_data.iter().map(|v| (*v as f32 - m) / s).collect();
        let data = pool.allocate(&[n, h, w, c])?;
        pool.write(data, &normalized)?;

        let narrowed: Vec<f32> = raw_labels.iter().map(|v| (*v as u16) as f32).collect();
        let labels = pool.allocate(&[n])?;
        pool.write(labels, &narrowed)?;

        Ok(Dataset {
            data,
            labels,
            batch: n,
        })
    }
}
