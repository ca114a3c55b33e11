extern crate nalgebra as na;

use na::DMatrix;

use crate::Float;

pub mod filter;
pub mod pyramid;
pub mod features;
pub mod matching;

/// Single channel float image. Rows index y, columns index x.
#[derive(Debug,Clone,PartialEq)]
pub struct Image {
    pub buffer: DMatrix<Float>
}

impl Image {

    pub fn width(&self) -> usize {
        self.buffer.ncols()
    }

    pub fn height(&self) -> usize {
        self.buffer.nrows()
    }

    pub fn empty(width: usize, height: usize) -> Image {
        Image{ buffer: DMatrix::<Float>::zeros(height,width) }
    }

    /// Copies the first `rows*cols` samples of a packed row-major buffer.
    pub fn from_row_major_slice(rows: usize, cols: usize, data: &[Float]) -> Image {
        debug_assert!(data.len() >= rows*cols);
        Image{ buffer: DMatrix::<Float>::from_row_slice(rows, cols, &data[..rows*cols]) }
    }

    pub fn difference(minuend: &Image, subtrahend: &Image) -> Image {
        Image{ buffer: &minuend.buffer - &subtrahend.buffer }
    }

    /// Keeps every other sample in both directions. Odd trailing rows/columns are dropped.
    pub fn downsample_half(image: &Image) -> Image {
        let width = image.width();
        let height = image.height();

        let new_width = width/2;
        let new_height = height/2;

        let mut new_buffer = DMatrix::<Float>::zeros(new_height,new_width);
        for x in 0..new_width {
            for y in 0..new_height {
                new_buffer[(y,x)] = image.buffer[(2*y,2*x)];
            }
        }

        Image{ buffer: new_buffer }
    }
}
