// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context as _};

use streamloom::config::{load_and_validate_config, Config, InputConfig, OutputConfig};
use streamloom::context::Context;
use streamloom::filters::{AudioMixer, Gain, RtpReceiver, RtpTransmitter};
use streamloom::pipeline::{RECEIVER_ID, TRANSMITTER_ID};
use streamloom::traits::{
    Filter, Packaging, PortId, ReceiverEndpoint, TransmitterEndpoint, DEFAULT_PORT,
};
use streamloom::workers::Worker;

// Registry ids for the filters this driver creates.
const MIXER_ID: i32 = 10;
const ENCODER_ID: i32 = 11;

// Worker ids: one per endpoint, one for the mixer, one shared by the
// transmission chain.
const RECEIVER_WORKER: i32 = 100;
const TRANSMITTER_WORKER: i32 = 101;
const MIXER_WORKER: i32 = 102;
const CHAIN_WORKER: i32 = 103;

// Transmitter reader the mixed output lands on; both publish sessions
// share it.
const MIXED_READER: PortId = 1;

fn usage(program: &str) {
    eprintln!("Usage: {} [-c config.yaml] [-a port ...] [-r uri ...]", program);
    eprintln!("  -c  pipeline configuration file");
    eprintln!("  -a  local RTP input port (repeatable)");
    eprintln!("  -r  remote source uri (repeatable)");
    eprintln!("Example: {} -a 5004 -a 5006 -r rtsp://cam.example/feed", program);
}

struct CliArgs {
    config_file: Option<String>,
    ports: Vec<PortId>,
    uris: Vec<String>,
}

fn parse_args(args: &[String]) -> anyhow::Result<CliArgs> {
    let mut parsed = CliArgs {
        config_file: None,
        ports: Vec::new(),
        uris: Vec::new(),
    };

    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let value = iter
            .next()
            .ok_or_else(|| anyhow!("flag '{}' is missing its value", flag))?;
        match flag.as_str() {
            "-c" => parsed.config_file = Some(value.clone()),
            "-a" => parsed
                .ports
                .push(value.parse().with_context(|| format!("bad port '{}'", value))?),
            "-r" => parsed.uris.push(value.clone()),
            other => return Err(anyhow!("unknown flag '{}'", other)),
        }
    }
    Ok(parsed)
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let cli = match parse_args(&args[1..]) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{}", e);
            usage(&args[0]);
            std::process::exit(1);
        }
    };

    let mut config = match &cli.config_file {
        Some(path) => load_and_validate_config(path)?,
        None => Config {
            engine: Default::default(),
            inputs: Vec::new(),
            sources: Vec::new(),
            outputs: Vec::new(),
        },
    };

    // CLI inputs extend whatever the config file declared.
    for port in &cli.ports {
        config.inputs.push(InputConfig::for_port(*port));
    }
    config.sources.extend(cli.uris.iter().cloned());

    if config.inputs.is_empty() && config.sources.is_empty() {
        eprintln!("no inputs configured");
        usage(&args[0]);
        std::process::exit(1);
    }

    if config.outputs.is_empty() {
        config.outputs = vec![
            OutputConfig {
                name: "plainrtp".to_string(),
                stream_index: 1,
                packaging: Packaging::Rtp,
            },
            OutputConfig {
                name: "mpegts".to_string(),
                stream_index: 2,
                packaging: Packaging::MpegTs,
            },
        ];
    }

    init_tracing(config.engine.log_filter.as_deref());

    let receiver = Arc::new(RtpReceiver::new());
    let transmitter = Arc::new(RtpTransmitter::new());
    let ctx = Context::new(
        Arc::clone(&receiver) as Arc<dyn Filter>,
        Arc::clone(&transmitter) as Arc<dyn Filter>,
    );
    let pipe = ctx.pipeline();

    // Endpoint workers.
    pipe.add_worker(RECEIVER_ID, Arc::new(Worker::new(RECEIVER_WORKER)))
        .map_err(|e| anyhow!("receiver worker: {}", e))?;
    pipe.add_worker(TRANSMITTER_ID, Arc::new(Worker::new(TRANSMITTER_WORKER)))
        .map_err(|e| anyhow!("transmitter worker: {}", e))?;

    // Mixing stage with its own worker.
    pipe.add_filter(MIXER_ID, Arc::new(AudioMixer::new()))
        .map_err(|e| anyhow!("mixer: {}", e))?;
    pipe.add_worker(MIXER_ID, Arc::new(Worker::new(MIXER_WORKER)))
        .map_err(|e| anyhow!("mixer worker: {}", e))?;

    // Transmission chain: mixer output through a unity gain stage into the
    // egress endpoint, driven by one shared worker.
    pipe.add_filter(ENCODER_ID, Arc::new(Gain::unity()))
        .map_err(|e| anyhow!("encoder: {}", e))?;
    let chain = pipe.create_path(MIXER_ID, TRANSMITTER_ID, DEFAULT_PORT, MIXED_READER, vec![ENCODER_ID]);
    pipe.connect_path(&chain)
        .map_err(|e| anyhow!("transmission chain: {}", e))?;
    let chain_worker = Arc::new(Worker::new(CHAIN_WORKER));
    pipe.add_worker_to_path(&chain, Arc::clone(&chain_worker))
        .map_err(|e| anyhow!("chain worker: {}", e))?;
    ctx.workers()
        .add_worker(CHAIN_WORKER, chain_worker)
        .map_err(|e| anyhow!("chain worker: {}", e))?;
    pipe.add_path(1, chain)
        .map_err(|e| anyhow!("chain path: {}", e))?;

    // Publish sessions over the mixed output.
    for output in &config.outputs {
        transmitter
            .add_connection(&[MIXED_READER], output.stream_index, output.packaging, &output.name)
            .map_err(|e| anyhow!("output '{}': {}", output.name, e))?;
    }

    // Local inputs are ready as soon as their port is registered; each one
    // gets a direct path into the mixer keyed by its port.
    let mut next_path = 2;
    for input in &config.inputs {
        let reader = receiver
            .add_session(input.descriptor())
            .map_err(|e| anyhow!("input {}: {}", input.port, e))?;
        receiver
            .mark_ready(reader)
            .map_err(|e| anyhow!("input {}: {}", input.port, e))?;

        let path = pipe.create_path(RECEIVER_ID, MIXER_ID, reader, reader, vec![]);
        pipe.connect_path(&path)
            .map_err(|e| anyhow!("input {}: {}", input.port, e))?;
        pipe.add_path(next_path, path)
            .map_err(|e| anyhow!("input {}: {}", input.port, e))?;
        next_path += 1;
    }

    // Remote sources negotiate out of band; a source that never becomes
    // ready is released and the engine keeps running with the rest.
    for (index, uri) in config.sources.iter().enumerate() {
        let port = 20000 + index as PortId;
        let mut descriptor = InputConfig::for_port(port).descriptor();
        descriptor.name = uri.clone();

        let reader = receiver
            .add_session(descriptor)
            .map_err(|e| anyhow!("source '{}': {}", uri, e))?;
        match receiver.await_ready(
            reader,
            config.engine.handshake_retries,
            config.engine.handshake_interval(),
        ) {
            Ok(()) => {
                let path = pipe.create_path(RECEIVER_ID, MIXER_ID, reader, reader, vec![]);
                pipe.connect_path(&path)
                    .map_err(|e| anyhow!("source '{}': {}", uri, e))?;
                pipe.add_path(next_path, path)
                    .map_err(|e| anyhow!("source '{}': {}", uri, e))?;
                next_path += 1;
            }
            Err(e) => {
                tracing::warn!(uri = %uri, error = %e, "skipping source that never became ready");
            }
        }
    }

    pipe.start_workers();
    tracing::info!(
        inputs = config.inputs.len(),
        sources = config.sources.len(),
        outputs = config.outputs.len(),
        "engine running"
    );

    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    ctrlc::set_handler(move || {
        // Only request shutdown here; teardown happens on the main thread.
        flag.store(true, Ordering::SeqCst);
    })
    .context("installing interrupt handler")?;

    while !interrupted.load(Ordering::SeqCst) {
        std::thread::sleep(Duration::from_millis(100));
    }

    tracing::info!("interrupt received, shutting down");
    ctx.shutdown();
    Ok(())
}

fn init_tracing(filter: Option<&str>) {
    use tracing_subscriber::EnvFilter;

    let env_filter = match filter {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}
