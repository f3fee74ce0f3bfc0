//! Image kernels
//!
//! A small image library with the calling conventions of a wasm-compiled
//! vision library: matrices live in a slab owned by the library, callers hold
//! copyable handles, and every matrix must be released with
//! [`ImageLibrary::delete`]. Element data is exposed as a little-endian byte
//! view regardless of depth.

use core_types::{HarnessError, HarnessResult};

/// Element type of a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    /// 8-bit unsigned
    U8,
    /// 32-bit signed
    S32,
    /// 64-bit float
    F64,
}

impl Depth {
    /// Bytes per element.
    pub fn size(self) -> usize {
        match self {
            Depth::U8 => 1,
            Depth::S32 => 4,
            Depth::F64 => 8,
        }
    }
}

/// Handle to a matrix owned by an [`ImageLibrary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mat(usize);

/// Shape and element type of a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatInfo {
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub cols: usize,
    /// Channels per pixel
    pub channels: usize,
    /// Element type
    pub depth: Depth,
}

impl MatInfo {
    const EMPTY: MatInfo = MatInfo {
        rows: 0,
        cols: 0,
        channels: 1,
        depth: Depth::U8,
    };

    fn byte_len(&self) -> usize {
        self.rows * self.cols * self.channels * self.depth.size()
    }
}

#[derive(Debug)]
struct MatBuf {
    info: MatInfo,
    data: Vec<u8>,
}

// BGR -> gray fixed-point coefficients, 14 fractional bits
const GRAY_SHIFT: u32 = 14;
const B2Y: u32 = 1868;
const G2Y: u32 = 9617;
const R2Y: u32 = 4899;

/// The library instance.
#[derive(Debug)]
pub struct ImageLibrary {
    mats: Vec<Option<MatBuf>>,
    free: Vec<usize>,
    gray_tables: [[u32; 256]; 3],
}

impl ImageLibrary {
    /// Initializes the library.
    pub async fn load() -> HarnessResult<Self> {
        let mut gray_tables = [[0u32; 256]; 3];
        for (table, coeff) in gray_tables.iter_mut().zip([B2Y, G2Y, R2Y]) {
            for (value, entry) in table.iter_mut().enumerate() {
                *entry = value as u32 * coeff;
            }
        }
        tracing::debug!("image library initialized");
        Ok(Self {
            mats: Vec::new(),
            free: Vec::new(),
            gray_tables,
        })
    }

    fn alloc(&mut self, info: MatInfo, data: Vec<u8>) -> Mat {
        let buf = Some(MatBuf { info, data });
        match self.free.pop() {
            Some(index) => {
                self.mats[index] = buf;
                Mat(index)
            }
            None => {
                self.mats.push(buf);
                Mat(self.mats.len() - 1)
            }
        }
    }

    /// A `rows × cols` u8 matrix with every channel of every pixel set to `value`.
    pub fn mat_filled(&mut self, rows: usize, cols: usize, channels: usize, value: u8) -> Mat {
        let info = MatInfo {
            rows,
            cols,
            channels,
            depth: Depth::U8,
        };
        self.alloc(info, vec![value; info.byte_len()])
    }

    /// An empty matrix, to be used as an output.
    pub fn mat_empty(&mut self) -> Mat {
        self.alloc(MatInfo::EMPTY, Vec::new())
    }

    /// A single-channel u8 identity matrix.
    pub fn eye(&mut self, rows: usize, cols: usize) -> Mat {
        let mat = self.mat_filled(rows, cols, 1, 0);
        if let Some(Some(buf)) = self.mats.get_mut(mat.0) {
            for i in 0..rows.min(cols) {
                buf.data[i * cols + i] = 1;
            }
        }
        mat
    }

    fn buf(&self, mat: Mat) -> HarnessResult<&MatBuf> {
        self.mats
            .get(mat.0)
            .and_then(Option::as_ref)
            .ok_or_else(|| HarnessError::workload(format!("matrix {} was deleted", mat.0)))
    }

    fn buf_mut(&mut self, mat: Mat) -> HarnessResult<&mut MatBuf> {
        self.mats
            .get_mut(mat.0)
            .and_then(Option::as_mut)
            .ok_or_else(|| HarnessError::workload(format!("matrix {} was deleted", mat.0)))
    }

    /// Shape and type of `mat`.
    pub fn info(&self, mat: Mat) -> HarnessResult<MatInfo> {
        Ok(self.buf(mat)?.info)
    }

    /// Byte view of the matrix elements.
    pub fn data(&self, mat: Mat) -> HarnessResult<&[u8]> {
        Ok(&self.buf(mat)?.data)
    }

    /// Mutable byte view of the matrix elements.
    pub fn data_mut(&mut self, mat: Mat) -> HarnessResult<&mut [u8]> {
        Ok(&mut self.buf_mut(mat)?.data)
    }

    /// Releases `mat`. Deleting twice is a no-op.
    pub fn delete(&mut self, mat: Mat) {
        if let Some(slot) = self.mats.get_mut(mat.0) {
            if slot.take().is_some() {
                self.free.push(mat.0);
            }
        }
    }

    /// Number of matrices not yet deleted.
    pub fn live_mats(&self) -> usize {
        self.mats.iter().filter(|slot| slot.is_some()).count()
    }

    /// Reshapes `dst` to `info`, reusing its allocation, and hands back its data.
    fn take_output(&mut self, dst: Mat, info: MatInfo) -> HarnessResult<Vec<u8>> {
        let buf = self.buf_mut(dst)?;
        buf.info = info;
        let mut data = std::mem::take(&mut buf.data);
        data.clear();
        data.resize(info.byte_len(), 0);
        Ok(data)
    }

    fn put_output(&mut self, dst: Mat, data: Vec<u8>) -> HarnessResult<()> {
        self.buf_mut(dst)?.data = data;
        Ok(())
    }

    fn expect_u8(&self, src: Mat, channels: &[usize], op: &str) -> HarnessResult<MatInfo> {
        let info = self.info(src)?;
        if info.depth != Depth::U8 || !channels.contains(&info.channels) {
            return Err(HarnessError::workload(format!(
                "{}: unsupported source ({} channel(s), {:?})",
                op, info.channels, info.depth
            )));
        }
        Ok(info)
    }

    /// Converts a 3- or 4-channel BGR(A) image to single-channel gray.
    pub fn cvt_color_bgr2gray(&mut self, src: Mat, dst: Mat) -> HarnessResult<()> {
        let info = self.expect_u8(src, &[3, 4], "cvtColor")?;
        let mut out = self.take_output(dst, MatInfo { channels: 1, ..info })?;

        let [b_tab, g_tab, r_tab] = &self.gray_tables;
        let round = 1u32 << (GRAY_SHIFT - 1);
        let pixels = self.data(src)?.chunks_exact(info.channels);
        for (gray, px) in out.iter_mut().zip(pixels) {
            let y = b_tab[px[0] as usize] + g_tab[px[1] as usize] + r_tab[px[2] as usize] + round;
            *gray = (y >> GRAY_SHIFT) as u8;
        }

        self.put_output(dst, out)
    }

    /// Binary threshold: `src > thresh ? maxval : 0`, per element.
    pub fn threshold_binary(
        &mut self,
        src: Mat,
        dst: Mat,
        thresh: f64,
        maxval: f64,
    ) -> HarnessResult<()> {
        let info = self.expect_u8(src, &[1, 2, 3, 4], "threshold")?;
        let mut out = self.take_output(dst, info)?;

        // u8 sources compare against the floored threshold
        let cutoff = thresh.floor().clamp(-1.0, 255.0) as i32;
        let high = maxval.round().clamp(0.0, 255.0) as u8;
        for (o, &s) in out.iter_mut().zip(self.data(src)?) {
            *o = if i32::from(s) > cutoff { high } else { 0 };
        }

        self.put_output(dst, out)
    }

    /// Integral image and integral of squares of a single-channel u8 image.
    ///
    /// `sum` becomes `(rows+1) × (cols+1)` s32 and `sqsum` the same shape
    /// in f64; the first row and column are zero.
    pub fn integral2(&mut self, src: Mat, sum: Mat, sqsum: Mat) -> HarnessResult<()> {
        let info = self.expect_u8(src, &[1], "integral")?;
        let (rows, cols) = (info.rows, info.cols);
        let out_info = |depth| MatInfo {
            rows: rows + 1,
            cols: cols + 1,
            channels: 1,
            depth,
        };
        let mut sum_out = self.take_output(sum, out_info(Depth::S32))?;
        let mut sq_out = self.take_output(sqsum, out_info(Depth::F64))?;

        let stride = cols + 1;
        let mut sums = vec![0i32; stride];
        let mut sqsums = vec![0f64; stride];
        let src_data = self.data(src)?;
        for y in 0..rows {
            let row = &src_data[y * cols..(y + 1) * cols];
            let (mut acc, mut sq_acc) = (0i32, 0f64);
            for (x, &v) in row.iter().enumerate() {
                acc += i32::from(v);
                sq_acc += f64::from(v) * f64::from(v);
                sums[x + 1] += acc;
                sqsums[x + 1] += sq_acc;
            }
            let base = (y + 1) * stride;
            for x in 0..stride {
                let i = base + x;
                sum_out[i * 4..i * 4 + 4].copy_from_slice(&sums[x].to_le_bytes());
                sq_out[i * 8..i * 8 + 8].copy_from_slice(&sqsums[x].to_le_bytes());
            }
        }

        self.put_output(sum, sum_out)?;
        self.put_output(sqsum, sq_out)
    }
}
