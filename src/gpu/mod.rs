//! GPU compute-kernel contract (spec §4.I, feature `gpu`): uploads the
//! same [`crate::regex::nfa::Program`]/pattern bytes the CPU path uses to
//! a `wgpu` device and runs one of the two line-matching kernels in
//! `shaders/`, reading the resulting [`MatchRecord`]s back.
//!
//! Stack and dispatch pattern grounded on the `wgpu` + `bytemuck` +
//! `pollster` combination used in the retrieval pack's `tiny-editor`
//! example (the only pack repo with a GPU dependency) — `pollster::block_on`
//! turns the otherwise-async `wgpu` device/queue setup and buffer readback
//! into the synchronous calls this crate's rest of the API expects.

pub mod layout;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::engine::{self, EngineResult};
use crate::error::{Error, Result};
use crate::fields;
use crate::options::{FieldSeparator, Options};
use crate::records::{FieldRecord, MatchRecord};
use crate::regex::{self, nfa};
use crate::{MAX_GPU_BUFFER_SIZE, MAX_RESULTS};

use layout::GpuParams;

const LITERAL_SHADER: &str = include_str!("shaders/line_match_literal.wgsl");
const REGEX_SHADER: &str = include_str!("shaders/line_match_regex.wgsl");

const FLAG_CASE_INSENSITIVE: u32 = 1 << 0;
const FLAG_INVERT_MATCH: u32 = 1 << 5;

/// An acquired GPU device/queue pair, reused across dispatches. Acquiring
/// one is fallible and potentially slow (adapter negotiation); callers
/// are expected to build one once and hand it to [`crate::dispatch`]'s
/// decision of whether a given workload should use it at all.
pub struct GpuContext {
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl GpuContext {
    /// Acquire a GPU adapter and device, or `None` if none is available —
    /// never an error, since "no GPU here" is a normal, silently-handled
    /// outcome for [`crate::dispatch::select_backend`] (spec §4.H).
    pub fn new() -> Option<Self> {
        pollster::block_on(Self::new_async())
    }

    async fn new_async() -> Option<Self> {
        let instance = wgpu::Instance::default();
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                ..Default::default()
            })
            .await
            .ok()?;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("vecawk-gpu-device"),
                ..Default::default()
            })
            .await
            .ok()?;
        Some(Self { device, queue })
    }

    /// Run the literal-matching kernel over every line of `input`, then
    /// split every returned line into fields on the host (spec §4.I: the
    /// kernel itself always writes `field_count = 0`; field extraction is
    /// the CPU field-splitter run once per match, same as the CPU path in
    /// [`crate::engine`]).
    pub fn dispatch_literal(
        &self,
        input: &[u8],
        pattern: &[u8],
        case_insensitive: bool,
        invert_match: bool,
        field_separator: &FieldSeparator,
    ) -> Result<EngineResult> {
        check_size(input.len())?;
        let bounds = layout::compute_line_bounds(input);
        if bounds.is_empty() {
            return Ok(EngineResult::default());
        }

        let params = GpuParams {
            line_count: bounds.len() as u32,
            aux: pattern.len() as u32,
            flags: build_flags(case_insensitive, invert_match),
            max_results: MAX_RESULTS as u32,
        };

        let module = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("vecawk-literal-kernel"),
            source: wgpu::ShaderSource::Wgsl(LITERAL_SHADER.into()),
        });

        let input_buf = self.storage_buffer("literal-input", &pack_bytes(input), wgpu::BufferUsages::STORAGE);
        let pattern_buf = self.storage_buffer("literal-pattern", &pack_bytes(pattern), wgpu::BufferUsages::STORAGE);
        let starts_buf = self.storage_buffer("literal-starts", &bounds.starts, wgpu::BufferUsages::STORAGE);
        let ends_buf = self.storage_buffer("literal-ends", &bounds.ends, wgpu::BufferUsages::STORAGE);

        let buffers = [
            (0, self.uniform_buffer("literal-params", &[params])),
            (1, input_buf),
            (2, pattern_buf),
            (3, starts_buf),
            (4, ends_buf),
        ];

        let matches = self.run_kernel(&module, bounds.len() as u32, &buffers)?;
        Ok(attach_fields(input, matches, field_separator))
    }

    /// Run the NFA-simulation kernel over every line of `input`, then split
    /// every returned line into fields on the host, as `dispatch_literal`
    /// does.
    ///
    /// `program.nfa()`'s state count is checked against
    /// [`GPU_MAX_NFA_STATES`] before upload: the kernel's epsilon-closure
    /// scratch array (`on_list` in `line_match_regex.wgsl`) is sized to that
    /// capacity and indexed directly by NFA state index, so a program past
    /// it would read and write out of bounds on the device. That case falls
    /// back to a CPU scan here rather than risking the dispatch.
    pub fn dispatch_regex(
        &self,
        input: &[u8],
        program: &regex::Program,
        case_insensitive: bool,
        invert_match: bool,
        field_separator: &FieldSeparator,
    ) -> Result<EngineResult> {
        check_size(input.len())?;
        let nfa_program = program.nfa();

        if exceeds_gpu_state_capacity(nfa_program) {
            log::warn!(
                "compiled regex has {} states, exceeding the GPU kernel's {GPU_MAX_NFA_STATES}-entry \
                 epsilon-closure scratch capacity (line_match_regex.wgsl's `on_list`); falling back to CPU",
                nfa_program.states.len()
            );
            return Ok(cpu_regex_fallback(input, program, invert_match, field_separator));
        }

        let bounds = layout::compute_line_bounds(input);
        if bounds.is_empty() {
            return Ok(EngineResult::default());
        }

        // `case_insensitive` is already baked into the program's byte
        // classes at compile time (see `regex::compile::fold_case_insensitive`),
        // so the kernel only needs the invert-match bit here.
        let params = GpuParams {
            line_count: bounds.len() as u32,
            aux: nfa_program.start,
            flags: build_flags(false, invert_match),
            max_results: MAX_RESULTS as u32,
        };
        let _ = case_insensitive;

        let module = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("vecawk-regex-kernel"),
            source: wgpu::ShaderSource::Wgsl(REGEX_SHADER.into()),
        });

        let input_buf = self.storage_buffer("regex-input", &pack_bytes(input), wgpu::BufferUsages::STORAGE);
        let states_buf = self.storage_buffer("regex-states", &nfa_program.states, wgpu::BufferUsages::STORAGE);
        let classes_buf =
            self.storage_buffer("regex-classes", &flatten_classes(&nfa_program.classes), wgpu::BufferUsages::STORAGE);
        let starts_buf = self.storage_buffer("regex-starts", &bounds.starts, wgpu::BufferUsages::STORAGE);
        let ends_buf = self.storage_buffer("regex-ends", &bounds.ends, wgpu::BufferUsages::STORAGE);

        let buffers = [
            (0, self.uniform_buffer("regex-params", &[params])),
            (1, input_buf),
            (2, states_buf),
            (3, classes_buf),
            (4, starts_buf),
            (5, ends_buf),
        ];

        let matches = self.run_kernel(&module, bounds.len() as u32, &buffers)?;
        Ok(attach_fields(input, matches, field_separator))
    }

    fn uniform_buffer<T: Pod>(&self, label: &str, data: &[T]) -> wgpu::Buffer {
        self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(data),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        })
    }

    fn storage_buffer<T: Pod>(&self, label: &str, data: &[T], extra: wgpu::BufferUsages) -> wgpu::Buffer {
        self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(data),
            usage: extra | wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::COPY_SRC,
        })
    }

    /// Build the pipeline, bind the given buffers in binding order, append
    /// the results/result-count buffers as the two trailing bindings,
    /// dispatch one workgroup per 64 lines, and read the results back.
    fn run_kernel(
        &self,
        module: &wgpu::ShaderModule,
        line_count: u32,
        leading_buffers: &[(u32, wgpu::Buffer)],
    ) -> Result<Vec<MatchRecord>> {
        let results_buf = self.storage_buffer(
            "results",
            &vec![MatchRecord::default(); MAX_RESULTS.min(line_count as usize).max(1)],
            wgpu::BufferUsages::STORAGE,
        );
        let count_buf = self.storage_buffer("result-count", &[0u32], wgpu::BufferUsages::STORAGE);

        let results_binding = leading_buffers.len() as u32;
        let count_binding = results_binding + 1;

        let pipeline = self.device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("vecawk-line-match"),
            layout: None,
            module,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

        let layout = pipeline.get_bind_group_layout(0);
        let mut entries: Vec<wgpu::BindGroupEntry> = leading_buffers
            .iter()
            .map(|(binding, buf)| wgpu::BindGroupEntry { binding: *binding, resource: buf.as_entire_binding() })
            .collect();
        entries.push(wgpu::BindGroupEntry { binding: results_binding, resource: results_buf.as_entire_binding() });
        entries.push(wgpu::BindGroupEntry { binding: count_binding, resource: count_buf.as_entire_binding() });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("vecawk-line-match-bind-group"),
            layout: &layout,
            entries: &entries,
        });

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor { label: None, timestamp_writes: None });
            pass.set_pipeline(&pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.dispatch_workgroups(line_count.div_ceil(64), 1, 1);
        }

        let readback = self.read_buffer_u32(&mut encoder, &count_buf, 1);
        self.queue.submit(Some(encoder.finish()));
        let count = pollster::block_on(self.map_u32(readback))[0].min(MAX_RESULTS as u32) as usize;

        if count == 0 {
            return Ok(Vec::new());
        }

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        let readback = self.read_buffer_records(&mut encoder, &results_buf, count);
        self.queue.submit(Some(encoder.finish()));
        Ok(pollster::block_on(self.map_records(readback, count)))
    }

    fn read_buffer_u32(&self, encoder: &mut wgpu::CommandEncoder, src: &wgpu::Buffer, len: usize) -> wgpu::Buffer {
        let size = (len * std::mem::size_of::<u32>()) as u64;
        let staging = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("staging-u32"),
            size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        encoder.copy_buffer_to_buffer(src, 0, &staging, 0, size);
        staging
    }

    fn read_buffer_records(&self, encoder: &mut wgpu::CommandEncoder, src: &wgpu::Buffer, count: usize) -> wgpu::Buffer {
        let size = (count * std::mem::size_of::<MatchRecord>()) as u64;
        let staging = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("staging-records"),
            size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        encoder.copy_buffer_to_buffer(src, 0, &staging, 0, size);
        staging
    }

    async fn map_u32(&self, staging: wgpu::Buffer) -> Vec<u32> {
        let slice = staging.slice(..);
        let (tx, rx) = futures_intrusive_channel();
        slice.map_async(wgpu::MapMode::Read, move |res| tx(res));
        self.device.poll(wgpu::Maintain::Wait);
        rx.await.expect("map_async channel closed").expect("buffer map failed");
        let data = slice.get_mapped_range();
        let values = bytemuck::cast_slice(&data).to_vec();
        drop(data);
        staging.unmap();
        values
    }

    async fn map_records(&self, staging: wgpu::Buffer, count: usize) -> Vec<MatchRecord> {
        let slice = staging.slice(..);
        let (tx, rx) = futures_intrusive_channel();
        slice.map_async(wgpu::MapMode::Read, move |res| tx(res));
        self.device.poll(wgpu::Maintain::Wait);
        rx.await.expect("map_async channel closed").expect("buffer map failed");
        let data = slice.get_mapped_range();
        let values: Vec<MatchRecord> = bytemuck::cast_slice(&data)[..count].to_vec();
        drop(data);
        staging.unmap();
        values
    }
}

/// Run the CPU field-splitter once per `MatchRecord` the kernel returned,
/// patching the real `field_count` back in and producing the `FieldRecord`
/// array the kernel itself never populates (spec §4.I).
fn attach_fields(input: &[u8], mut matches: Vec<MatchRecord>, field_separator: &FieldSeparator) -> EngineResult {
    let mut fields = Vec::new();
    for (line_idx, m) in matches.iter_mut().enumerate() {
        let line = &input[m.line_start as usize..m.line_end as usize];
        let line_fields = fields::split(line, field_separator);
        for (i, field) in line_fields.iter().enumerate() {
            fields.push(FieldRecord::new(
                line_idx as u32,
                (i + 1) as u32,
                m.line_start + field.start,
                m.line_start + field.end,
            ));
        }
        m.field_count = line_fields.len() as u32;
    }
    EngineResult { matches, fields }
}

fn build_flags(case_insensitive: bool, invert_match: bool) -> u32 {
    let mut flags = 0u32;
    if case_insensitive {
        flags |= FLAG_CASE_INSENSITIVE;
    }
    if invert_match {
        flags |= FLAG_INVERT_MATCH;
    }
    flags
}

fn check_size(len: usize) -> Result<()> {
    if len > MAX_GPU_BUFFER_SIZE {
        return Err(Error::InputTooLarge { len, max: MAX_GPU_BUFFER_SIZE });
    }
    Ok(())
}

/// Pack a byte slice into `u32` words (4 bytes each, little-endian, zero
/// padded) for upload to a storage buffer — WGSL has no native `u8`
/// storage type.
fn pack_bytes(bytes: &[u8]) -> Vec<u32> {
    bytes
        .chunks(4)
        .map(|chunk| {
            let mut word = [0u8; 4];
            word[..chunk.len()].copy_from_slice(chunk);
            u32::from_le_bytes(word)
        })
        .collect()
}

fn flatten_classes(classes: &[nfa::ClassBitmap]) -> Vec<u32> {
    classes.iter().flat_map(|c| c.iter().copied()).collect()
}

/// Capacity of `line_match_regex.wgsl`'s `on_list` epsilon-closure scratch
/// array. A pattern can compile to more NFA states than it has source
/// bytes (quantifiers and alternations each add states of their own), so
/// this is checked against the compiled program directly rather than
/// against [`crate::MAX_PATTERN_LEN`] at parse time — it reuses that same
/// constant only because the two bounds happen to coincide today.
const GPU_MAX_NFA_STATES: usize = crate::MAX_PATTERN_LEN;

fn exceeds_gpu_state_capacity(program: &nfa::Program) -> bool {
    program.states.len() > GPU_MAX_NFA_STATES
}

/// Run `program` on the CPU instead of the GPU kernel, for regex programs
/// the kernel's fixed-size scratch can't hold. `case_insensitive` is
/// omitted here for the same reason `dispatch_regex` ignores it: it is
/// already folded into the compiled program's byte classes.
fn cpu_regex_fallback(
    input: &[u8],
    program: &regex::Program,
    invert_match: bool,
    field_separator: &FieldSeparator,
) -> EngineResult {
    let pattern = crate::Pattern::Regex(program.clone());
    let options = Options::builder().invert_match(invert_match).field_separator(field_separator.clone()).build();
    engine::scan_lines(input, &pattern, &options)
}

/// A tiny channel adapter so `wgpu`'s callback-based `map_async` can be
/// `.await`ed, mirroring the oneshot-channel pattern most `wgpu` compute
/// examples use for synchronous buffer readback.
fn futures_intrusive_channel() -> (
    impl FnOnce(std::result::Result<(), wgpu::BufferAsyncError>) + Send + 'static,
    impl std::future::Future<Output = Option<std::result::Result<(), wgpu::BufferAsyncError>>>,
) {
    let (tx, rx) = futures_channel::oneshot::channel();
    (move |res| { let _ = tx.send(res); }, async move { rx.await.ok() })
}
