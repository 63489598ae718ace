use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

use rayon::prelude::*;
use vello_cpu::Pixmap;

use crate::effects::domain::{Direction, DomainMode};
use crate::effects::paint::ConvolutionEffect;
use crate::foundation::core::{IRect, ISize, Point, Rect, Rgba8Premul};
use crate::foundation::error::{BlurError, BlurResult};
use crate::foundation::format::{ColorSpace, PixelConfig};
use crate::render::FrameRGBA;
use crate::render::backend::{BlurRenderer, FillRect, RendererCaps, SizeFit, TargetDesc};
use crate::render::pixmap::{
    clear_pixmap, crop, fill_rect, pixel_clamped, pixmap_from_rgba8_premul,
    sample_bilinear, store_premul, write_rect,
};
use crate::render::surface_pool::{SurfacePool, SurfacePoolOpts, SurfacePoolStats};

/// CPU renderer configuration.
#[derive(Clone, Copy, Debug)]
pub struct CpuRendererOpts {
    pub(crate) max_texture_size: i32,
    pub(crate) max_kernel_radius: i32,
    pub(crate) pool: SurfacePoolOpts,
    pub(crate) uninit_fill: Option<Rgba8Premul>,
    pub(crate) fail_allocations_after: Option<usize>,
}

impl Default for CpuRendererOpts {
    fn default() -> Self {
        let caps = RendererCaps::default();
        Self {
            max_texture_size: caps.max_texture_size,
            max_kernel_radius: caps.max_kernel_radius,
            pool: SurfacePoolOpts::default(),
            uninit_fill: None,
            fail_allocations_after: None,
        }
    }
}

impl CpuRendererOpts {
    /// Largest surface edge; sizes above `u16::MAX` are rejected regardless.
    pub fn with_max_texture_size(mut self, max: i32) -> Self {
        self.max_texture_size = max;
        self
    }

    /// Largest kernel radius advertised in [`RendererCaps`].
    pub fn with_max_kernel_radius(mut self, max: i32) -> Self {
        self.max_kernel_radius = max;
        self
    }

    /// Retention limits for recycled backing stores.
    pub fn with_pool(mut self, pool: SurfacePoolOpts) -> Self {
        self.pool = pool;
        self
    }

    /// Overwrite every allocated render target with `fill` before handing it out.
    ///
    /// Fresh and recycled backing stores alike read as `fill` until drawn, which exposes any
    /// stage that samples texels it never wrote.
    pub fn with_uninit_fill(mut self, fill: Option<Rgba8Premul>) -> Self {
        self.uninit_fill = fill;
        self
    }

    /// Fail every render-target allocation after `n` successful ones.
    pub fn with_fail_allocations_after(mut self, n: Option<usize>) -> Self {
        self.fail_allocations_after = n;
        self
    }
}

/// Shared handle to a CPU surface. Used both as render target and as texture.
///
/// The backing pixmap returns to the renderer's pool when the last handle drops.
#[derive(Clone)]
pub struct CpuSurface(Rc<SurfaceCell>);

struct SurfaceCell {
    id: u64,
    size: ISize,
    backing: ISize,
    config: PixelConfig,
    color_space: Option<ColorSpace>,
    pixmap: RefCell<Pixmap>,
    pool: Weak<RefCell<SurfacePool>>,
    live: Rc<Cell<usize>>,
}

impl Drop for SurfaceCell {
    fn drop(&mut self) {
        self.live.set(self.live.get().saturating_sub(1));
        let pixmap = std::mem::replace(self.pixmap.get_mut(), Pixmap::new(0, 0));
        if let Some(pool) = self.pool.upgrade() {
            pool.borrow_mut().release(pixmap);
        }
    }
}

impl CpuSurface {
    /// Allocation order, unique per renderer.
    pub fn id(&self) -> u64 {
        self.0.id
    }

    /// Logical size requested at allocation.
    pub fn size(&self) -> ISize {
        self.0.size
    }

    /// Size of the backing store; larger than [`Self::size`] for approx-fit targets.
    pub fn backing_size(&self) -> ISize {
        self.0.backing
    }

    pub fn config(&self) -> PixelConfig {
        self.0.config
    }

    pub fn color_space(&self) -> Option<ColorSpace> {
        self.0.color_space
    }

    fn pixmap(&self) -> BlurResult<Ref<'_, Pixmap>> {
        self.0.pixmap.try_borrow().map_err(|e| {
            anyhow::Error::new(e)
                .context(format!("surface {} is being written", self.0.id))
                .into()
        })
    }

    fn pixmap_mut(&self) -> BlurResult<RefMut<'_, Pixmap>> {
        self.0.pixmap.try_borrow_mut().map_err(|e| {
            anyhow::Error::new(e)
                .context(format!("surface {} is being read", self.0.id))
                .into()
        })
    }
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("id", &self.0.id)
            .field("size", &self.0.size)
            .field("config", &self.0.config)
            .finish_non_exhaustive()
    }
}

/// Reference renderer that evaluates blur effects on premultiplied RGBA8 pixmaps.
///
/// Every pixel config is stored as premultiplied RGBA8; the config is only recorded on the
/// surface.
pub struct CpuRenderer {
    opts: CpuRendererOpts,
    pool: Rc<RefCell<SurfacePool>>,
    live: Rc<Cell<usize>>,
    next_id: u64,
    allocations: usize,
}

impl CpuRenderer {
    pub fn new(opts: CpuRendererOpts) -> Self {
        Self {
            pool: Rc::new(RefCell::new(SurfacePool::new(opts.pool))),
            opts,
            live: Rc::new(Cell::new(0)),
            next_id: 0,
            allocations: 0,
        }
    }

    /// Number of surfaces with at least one live handle.
    pub fn live_surfaces(&self) -> usize {
        self.live.get()
    }

    /// Snapshot of the backing-store pool counters.
    pub fn pool_stats(&self) -> SurfacePoolStats {
        self.pool.borrow().stats()
    }

    /// Create an exact-fit texture from tightly packed premultiplied RGBA8 bytes.
    ///
    /// Uploads do not count towards `fail_allocations_after`.
    pub fn upload_rgba8_premul(
        &mut self,
        width: u32,
        height: u32,
        data: Vec<u8>,
    ) -> BlurResult<CpuSurface> {
        let size = ISize::new(
            i32::try_from(width).unwrap_or(i32::MAX),
            i32::try_from(height).unwrap_or(i32::MAX),
        );
        let (w, h) = self.check_size(size)?;
        let pixmap = pixmap_from_rgba8_premul(&data, w, h)?;
        Ok(self.wrap(pixmap, size, PixelConfig::Rgba8888, None))
    }

    /// Read back the logical region of a surface.
    pub fn read_rgba8_premul(&self, surface: &CpuSurface) -> BlurResult<FrameRGBA> {
        let size = surface.size();
        let data = crop(&*surface.pixmap()?, size.bounds())?;
        Ok(FrameRGBA {
            width: size.width as u32,
            height: size.height as u32,
            data,
            premultiplied: true,
        })
    }

    /// Read back the whole backing store, including approx-fit slack.
    pub fn read_backing_rgba8_premul(&self, surface: &CpuSurface) -> BlurResult<FrameRGBA> {
        let px = surface.pixmap()?;
        Ok(FrameRGBA {
            width: u32::from(px.width()),
            height: u32::from(px.height()),
            data: px.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    /// Reject sizes the renderer cannot back; returns the pixmap dimensions.
    fn check_size(&self, size: ISize) -> BlurResult<(u16, u16)> {
        let max = self.opts.max_texture_size.min(i32::from(u16::MAX));
        if size.is_empty() || size.width > max || size.height > max {
            tracing::warn!(
                width = size.width,
                height = size.height,
                max,
                "surface size rejected"
            );
            return Err(BlurError::allocation(format!(
                "surface {}x{} outside 1..={max}",
                size.width, size.height
            )));
        }
        Ok((size.width as u16, size.height as u16))
    }

    fn wrap(
        &mut self,
        pixmap: Pixmap,
        size: ISize,
        config: PixelConfig,
        color_space: Option<ColorSpace>,
    ) -> CpuSurface {
        let id = self.next_id;
        self.next_id += 1;
        self.live.set(self.live.get() + 1);
        let backing = ISize::new(i32::from(pixmap.width()), i32::from(pixmap.height()));
        CpuSurface(Rc::new(SurfaceCell {
            id,
            size,
            backing,
            config,
            color_space,
            pixmap: RefCell::new(pixmap),
            pool: Rc::downgrade(&self.pool),
            live: Rc::clone(&self.live),
        }))
    }
}

impl Default for CpuRenderer {
    fn default() -> Self {
        Self::new(CpuRendererOpts::default())
    }
}

impl BlurRenderer for CpuRenderer {
    type Target = CpuSurface;
    type Texture = CpuSurface;

    fn caps(&self) -> RendererCaps {
        RendererCaps {
            max_texture_size: self.opts.max_texture_size,
            max_kernel_radius: self.opts.max_kernel_radius,
        }
    }

    fn make_render_target(&mut self, desc: &TargetDesc) -> BlurResult<CpuSurface> {
        let size = ISize::new(desc.width, desc.height);
        let (w, h) = self.check_size(size)?;
        if let Some(n) = self.opts.fail_allocations_after
            && self.allocations >= n
        {
            tracing::warn!(
                width = size.width,
                height = size.height,
                allocations = self.allocations,
                "injected allocation failure"
            );
            return Err(BlurError::allocation(format!(
                "allocation budget of {n} surfaces exhausted"
            )));
        }

        let (bw, bh) = match desc.fit {
            SizeFit::Exact => (w, h),
            SizeFit::Approx => {
                let max = self.opts.max_texture_size.min(i32::from(u16::MAX));
                (
                    approx_dim(size.width, max) as u16,
                    approx_dim(size.height, max) as u16,
                )
            }
        };
        let mut pixmap = self.pool.borrow_mut().borrow(bw, bh);
        if let Some(fill) = self.opts.uninit_fill {
            clear_pixmap(&mut pixmap, fill.to_array());
        }
        self.allocations += 1;

        let surface = self.wrap(pixmap, size, desc.config, desc.color_space);
        tracing::trace!(
            id = surface.id(),
            width = size.width,
            height = size.height,
            backing_w = bw,
            backing_h = bh,
            fit = ?desc.fit,
            "render target allocated"
        );
        Ok(surface)
    }

    fn fill_rect(
        &mut self,
        target: &CpuSurface,
        effect: &ConvolutionEffect<CpuSurface>,
        geom: &FillRect,
    ) -> BlurResult<()> {
        let backing = target.backing_size().bounds();
        let Some(rect) = covered_pixels(geom.dst)
            .intersect(geom.clip)
            .and_then(|r| r.intersect(backing))
        else {
            return Ok(());
        };

        let shader = Shader::from_effect(effect);
        let row_len = (rect.width() as usize) * 4;
        let mut rows = vec![0u8; row_len * rect.height() as usize];
        {
            let guard = effect.texture().pixmap()?;
            let src: &Pixmap = &guard;
            let local = geom.local;
            rows.par_chunks_mut(row_len)
                .enumerate()
                .for_each(|(ry, row)| {
                    let y = rect.top + ry as i32;
                    for (rx, out) in row.chunks_exact_mut(4).enumerate() {
                        let x = rect.left + rx as i32;
                        let p = local * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                        out.copy_from_slice(&store_premul(shader.shade(src, p)));
                    }
                });
        }
        write_rect(&mut *target.pixmap_mut()?, rect, &rows);
        Ok(())
    }

    fn clear(&mut self, target: &CpuSurface, rect: IRect, color: Rgba8Premul) -> BlurResult<()> {
        fill_rect(&mut *target.pixmap_mut()?, rect, color);
        Ok(())
    }

    fn texture(&self, target: &CpuSurface) -> BlurResult<CpuSurface> {
        Ok(target.clone())
    }
}

/// Backing dimension for an approx-fit request.
///
/// At least 16; the next power of two up to 1024, and above that the midpoint between two
/// powers of two when the request fits under it.
pub(crate) fn approx_dim(dim: i32, max_texture_size: i32) -> i32 {
    let d = dim.max(16) as u32;
    let out = if d <= 1024 {
        d.next_power_of_two()
    } else {
        let ceil = d.next_power_of_two();
        let floor = if ceil == d { d } else { ceil / 2 };
        let mid = floor + floor / 2;
        if d <= mid { mid } else { ceil }
    };
    i64::from(out)
        .min(i64::from(max_texture_size))
        .max(i64::from(dim)) as i32
}

/// Pixels whose centers fall inside `dst`.
fn covered_pixels(dst: Rect) -> IRect {
    IRect::from_ltrb(
        (dst.x0 - 0.5).ceil() as i32,
        (dst.y0 - 0.5).ceil() as i32,
        (dst.x1 - 0.5).ceil() as i32,
        (dst.y1 - 0.5).ceil() as i32,
    )
}

/// Texture-free view of an effect, shareable across the row workers.
enum Shader<'a> {
    Sample {
        domain: Rect,
        mode: DomainMode,
    },
    Gaussian1D {
        direction: Direction,
        radius: i32,
        mode: DomainMode,
        bounds: [i32; 2],
        kernel: &'a [f32],
    },
    Gaussian2D {
        bounds: IRect,
        radius_x: i32,
        radius_y: i32,
        mode: DomainMode,
        kernel: &'a [f32],
    },
}

impl<'a> Shader<'a> {
    fn from_effect<T>(effect: &'a ConvolutionEffect<T>) -> Self {
        match effect {
            ConvolutionEffect::TextureDomain(e) => Self::Sample {
                domain: e.domain,
                mode: e.mode,
            },
            ConvolutionEffect::Gaussian1D(e) => Self::Gaussian1D {
                direction: e.direction,
                radius: e.radius,
                mode: e.mode,
                bounds: e.bounds,
                kernel: e.kernel(),
            },
            ConvolutionEffect::Gaussian2D(e) => Self::Gaussian2D {
                bounds: e.bounds,
                radius_x: e.radius_x,
                radius_y: e.radius_y,
                mode: e.mode,
                kernel: e.kernel(),
            },
        }
    }

    fn shade(&self, src: &Pixmap, p: Point) -> [f32; 4] {
        match *self {
            Self::Sample { domain, mode } => {
                let (Some(x), Some(y)) = (
                    mode.resolve_coord(p.x, domain.x0, domain.x1),
                    mode.resolve_coord(p.y, domain.y0, domain.y1),
                ) else {
                    return [0.0; 4];
                };
                sample_bilinear(src, x, y)
            }
            Self::Gaussian1D {
                direction,
                radius,
                mode,
                bounds,
                kernel,
            } => {
                let (tx, ty) = (p.x.floor() as i32, p.y.floor() as i32);
                let mut acc = [0.0f32; 4];
                for (i, w) in (-radius..=radius).zip(kernel) {
                    let texel = match direction {
                        Direction::X => mode
                            .resolve_texel(tx + i, bounds[0], bounds[1])
                            .map(|x| (x, ty)),
                        Direction::Y => mode
                            .resolve_texel(ty + i, bounds[0], bounds[1])
                            .map(|y| (tx, y)),
                    };
                    if let Some((x, y)) = texel {
                        accumulate(&mut acc, pixel_clamped(src, x, y), *w);
                    }
                }
                acc
            }
            Self::Gaussian2D {
                bounds,
                radius_x,
                radius_y,
                mode,
                kernel,
            } => {
                let (tx, ty) = (p.x.floor() as i32, p.y.floor() as i32);
                let row_len = (2 * radius_x + 1) as usize;
                let mut acc = [0.0f32; 4];
                for (j, row) in (-radius_y..=radius_y).zip(kernel.chunks_exact(row_len)) {
                    let Some(y) = mode.resolve_texel(ty + j, bounds.top, bounds.bottom) else {
                        continue;
                    };
                    for (i, w) in (-radius_x..=radius_x).zip(row) {
                        if let Some(x) = mode.resolve_texel(tx + i, bounds.left, bounds.right) {
                            accumulate(&mut acc, pixel_clamped(src, x, y), *w);
                        }
                    }
                }
                acc
            }
        }
    }
}

fn accumulate(acc: &mut [f32; 4], px: [f32; 4], w: f32) {
    for c in 0..4 {
        acc[c] += px[c] * w;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
