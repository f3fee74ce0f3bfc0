//! Image-kernel performance suite
//!
//! Each operation allocates its buffers once, runs a fixed number of timed
//! trials through the host clock, prints a timing summary, then checks the
//! content hash of every output buffer. Buffers are released before the
//! verdict is returned.

use crate::hash::content_hash;
use crate::kernels::{ImageLibrary, Mat};
use crate::registry::SizeClass;
use crate::stats::SampleSummary;
use core_types::{HarnessError, HarnessResult, Value};
use host_env::HostEnvironment;

/// Trials per operation.
pub const SAMPLES: usize = 1000;

const THRESHOLD: f64 = 127.0;
const THRESHOLD_MAX: f64 = 210.0;

/// Dimensions and expected output hashes for one size class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerfOptions {
    /// Image height
    pub height: usize,
    /// Image width
    pub width: usize,
    /// Hash of the cvtColor output
    pub cvt_color_dest: &'static str,
    /// Hash of the threshold output
    pub threshold_dest: &'static str,
    /// Hash of the integral sum buffer
    pub integral_sum: &'static str,
    /// Hash of the integral squared-sum buffer
    pub integral_sqsum: &'static str,
}

impl PerfOptions {
    /// Options for `size`.
    pub fn for_size(size: SizeClass) -> PerfOptions {
        match size {
            SizeClass::Small => PerfOptions {
                height: 640,
                width: 480,
                cvt_color_dest: "e3d3fa4dc3c2920d484a9e309be01af596f7a8abd57824e08096fb7c5a7fb055",
                threshold_dest: "8d7706b9d21f5ea62d147c19400a643163cef58e511fbe71138e42df3f880563",
                integral_sum: "b9e6e35229e9cb86b449b1a40b1cf93ccf32a5cf81fbd5b6542c2e92b0acbeb3",
                integral_sqsum: "88957e17569ce2628d514a3125ac8c4b229054b3cf0005c2a101451d41fe074a",
            },
            SizeClass::Medium => PerfOptions {
                height: 1280,
                width: 720,
                cvt_color_dest: "0fd0eb4246a578028c0288bcf4208701a6c4365dce612b300d030185207a5358",
                threshold_dest: "174d324bd9138bf4e168907ddf500ae8282705b5229a4f023c6eff2031cd8f86",
                integral_sum: "7caea4305f6611a488aef2be84b567ddb71f85f5c462424327405b3454b13c30",
                integral_sqsum: "9476de9674ee4f844baa75cb88b96d64e22ab3980c287608b10952cae4b9bdab",
            },
            SizeClass::Large => PerfOptions {
                height: 1920,
                width: 1080,
                cvt_color_dest: "a125cb019c88b60a687cd92b5c21ad16e811a7765934c1968614e6e5d4880c84",
                threshold_dest: "77897658dd78a779919dac57209a950aa76e7f3b0e58f5ca144794c5221ffa0e",
                integral_sum: "cb5f25c64da1f6348225fcbe36357ee885aa4f49d497a2e7e100dd6b01aa3555",
                integral_sqsum: "0fe35b14db31aa02a3675edec388ebc8e4aa93e005c34030a0f057ab5e93d252",
            },
        }
    }
}

/// Runs the sampling loop for one operation and prints its summary.
pub struct PerfSession<'e> {
    env: &'e HostEnvironment,
    samples: usize,
}

impl<'e> PerfSession<'e> {
    /// Session printing to `env` and timing with its clock.
    pub fn new(env: &'e HostEnvironment, samples: usize) -> Self {
        Self { env, samples }
    }

    /// Times `samples` calls of `trial` under the heading `name`.
    pub fn measure(
        &self,
        name: &str,
        mut trial: impl FnMut() -> HarnessResult<()>,
    ) -> HarnessResult<SampleSummary> {
        let timer = self.env.timer();
        self.env.print(&format!("=== {} ===", name));

        let mut perf = Vec::with_capacity(self.samples);
        let start = timer.now();
        for _ in 0..self.samples {
            let trial_start = timer.now();
            trial()?;
            let trial_end = timer.now();
            perf.push(timer.elapsed(trial_start, trial_end).as_secs_f64() * 1000.0);
        }
        let end = timer.now();

        let summary = SampleSummary::new(timer.elapsed(start, end).as_secs_f64() * 1000.0, &perf);
        for line in summary.report_lines() {
            self.env.print(&line);
        }
        tracing::debug!(op = name, samples = self.samples, mean_ms = summary.mean_ms, "sampled");
        Ok(summary)
    }
}

fn verify(lib: &ImageLibrary, mat: Mat, expected: &str, subject: &str) -> HarnessResult<()> {
    let actual = content_hash(lib.data(mat)?);
    if actual != expected {
        return Err(HarnessError::UnexpectedResult {
            subject: subject.to_string(),
            actual: Value::String(actual),
            expected: Value::String(expected.to_string()),
        });
    }
    Ok(())
}

fn release(lib: &mut ImageLibrary, mats: &[Mat]) {
    for &mat in mats {
        lib.delete(mat);
    }
}

/// cvtColor BGR→GRAY over a zero-filled 4-channel image.
pub fn perf_cvt_color(
    session: &PerfSession<'_>,
    lib: &mut ImageLibrary,
    option: &PerfOptions,
) -> HarnessResult<SampleSummary> {
    let source = lib.mat_filled(option.height, option.width, 4, 0);
    let dest = lib.mat_empty();

    let result = session
        .measure("cvtColor", || lib.cvt_color_bgr2gray(source, dest))
        .and_then(|summary| {
            verify(lib, dest, option.cvt_color_dest, "cvtColor dest")?;
            Ok(summary)
        });

    release(lib, &[source, dest]);
    result
}

/// Binary threshold over a zero image whose first pixels straddle the threshold.
pub fn perf_threshold(
    session: &PerfSession<'_>,
    lib: &mut ImageLibrary,
    option: &PerfOptions,
) -> HarnessResult<SampleSummary> {
    let source = lib.mat_filled(option.height, option.width, 1, 0);
    let dest = lib.mat_empty();

    let result: HarnessResult<SampleSummary> = (|| {
        let view = lib.data_mut(source)?;
        for (pixel, value) in view.iter_mut().zip([0, 100, 200]) {
            *pixel = value;
        }
        let summary = session.measure("threshold", || {
            lib.threshold_binary(source, dest, THRESHOLD, THRESHOLD_MAX)
        })?;
        verify(lib, dest, option.threshold_dest, "threshold dest")?;
        Ok(summary)
    })();

    release(lib, &[source, dest]);
    result
}

/// Integral and squared integral of an identity image.
pub fn perf_integral(
    session: &PerfSession<'_>,
    lib: &mut ImageLibrary,
    option: &PerfOptions,
) -> HarnessResult<SampleSummary> {
    let mat = lib.eye(option.height, option.width);
    let sum = lib.mat_empty();
    let sqsum = lib.mat_empty();

    let result = session
        .measure("integral", || lib.integral2(mat, sum, sqsum))
        .and_then(|summary| {
            verify(lib, sum, option.integral_sum, "integral sum")?;
            verify(lib, sqsum, option.integral_sqsum, "integral sqsum")?;
            Ok(summary)
        });

    release(lib, &[mat, sum, sqsum]);
    result
}

/// Loads the image library and runs every operation for `size`.
pub async fn run_suite(env: &HostEnvironment, size: SizeClass, samples: usize) -> HarnessResult<()> {
    run_with_options(env, &PerfOptions::for_size(size), samples).await
}

/// Like [`run_suite`] with explicit options.
pub async fn run_with_options(
    env: &HostEnvironment,
    option: &PerfOptions,
    samples: usize,
) -> HarnessResult<()> {
    let timer = env.timer();
    let prestart = timer.now();
    let mut lib = ImageLibrary::load().await?;
    let prepare = timer.since(prestart);
    env.print("image kernels loaded");
    env.print(&format!("Prepare time: {}", prepare.as_secs_f64() * 1000.0));

    let session = PerfSession::new(env, samples);
    perf_cvt_color(&session, &mut lib, option)?;
    perf_threshold(&session, &mut lib, option)?;
    perf_integral(&session, &mut lib, option)?;
    Ok(())
}
