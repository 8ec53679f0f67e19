/// Row-major read access shared by every plane type.
pub trait ImageView {
    type Pixel: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// Pixels of row `y`, exactly `width()` entries.
    fn row(&self, y: usize) -> &[Self::Pixel];

    fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    /// Pixel at signed coordinates, `None` outside the image.
    #[inline]
    fn pixel_checked(&self, x: isize, y: isize) -> Option<Self::Pixel> {
        if x < 0 || y < 0 || x as usize >= self.width() || y as usize >= self.height() {
            return None;
        }
        Some(self.row(y as usize)[x as usize])
    }
}

pub trait ImageViewMut: ImageView {
    fn row_mut(&mut self, y: usize) -> &mut [Self::Pixel];
}
