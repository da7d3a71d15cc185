use criterion::{black_box, criterion_group, criterion_main, Criterion};

use std::sync::Arc;

use mzsummary::meta::{Component, ComponentType, InstrumentConfiguration};
use mzsummary::params::ControlledVocabulary;
use mzsummary::prelude::*;
use mzsummary::spectrum::bindata::{ArrayType, BinaryArrayMap, BinaryDataArrayType, DataArray};
use mzsummary::spectrum::{Precursor, RawSpectrum, ScanEvent, SelectedIon, SpectrumDescription};
use mzsummary::{summarize_all, DetailLevel, SpectrumSummary};

const MS: ControlledVocabulary = ControlledVocabulary::MS;

fn make_spectrum(index: usize, config: &Arc<InstrumentConfiguration>, n_peaks: usize) -> RawSpectrum {
    let mut description = SpectrumDescription::new(
        format!("controllerType=0 controllerNumber=1 scan={}", index + 1),
        (index + 1).to_string(),
        index,
    );
    description.add_param(MS.param_val(1000511, "ms level", 2));
    description.add_param(MS.param_val(1000504, "base peak m/z", 445.12));
    description.add_param(MS.param_val(1000505, "base peak intensity", 1.5e6));
    description.add_param(MS.param_val(1000285, "total ion current", 3.2e7));

    let mut scan = ScanEvent::new(Some(config.clone()));
    scan.add_param(MS.param_val(1000016, "scan start time", 12.5).with_unit("UO:0000031", "minute"));
    scan.add_param(MS.param_val(
        1000512,
        "filter string",
        "FTMS + p NSI Full ms2 810.4132@hcd27.00",
    ));
    description.acquisition.scans.push(scan);

    let mut ion = SelectedIon::default();
    ion.add_param(MS.param_val(1000744, "selected ion m/z", 810.4132));
    ion.add_param(MS.param_val(1000041, "charge state", 2));
    let mut precursor = Precursor::default();
    precursor.selected_ions.push(ion);
    description.precursors.push(precursor);

    let mzs: Vec<f64> = (0..n_peaks).map(|i| 100.0 + i as f64 * 0.5).collect();
    let intensities: Vec<f32> = (0..n_peaks).map(|i| (i % 97) as f32 * 10.0).collect();
    let mut arrays = BinaryArrayMap::new();
    arrays.add(DataArray::from((ArrayType::MZArray, BinaryDataArrayType::Float64, mzs.as_slice())));
    arrays.add(DataArray::from((
        ArrayType::IntensityArray,
        BinaryDataArrayType::Float32,
        intensities.as_slice(),
    )));
    RawSpectrum::new(description, arrays)
}

fn make_config() -> Arc<InstrumentConfiguration> {
    let mut config = InstrumentConfiguration::new("IC1");
    let mut analyzer = Component::new(ComponentType::Analyzer, 1);
    analyzer.add_param(MS.param(1000484, "orbitrap"));
    config.push(analyzer);
    Arc::new(config)
}

fn update(c: &mut Criterion) {
    let config = make_config();
    let spectrum = make_spectrum(0, &config, 2000);
    let mut summary = SpectrumSummary::new();
    c.bench_function("summary_update_full", |b| {
        b.iter(|| summary.update(black_box(&spectrum)))
    });
    c.bench_function("summary_update_metadata", |b| {
        b.iter(|| {
            summary.update_with(
                black_box(&spectrum),
                mzsummary::psi_ms(),
                DetailLevel::MetadataOnly,
            )
        })
    });
}

fn batch(c: &mut Criterion) {
    let config = make_config();
    let spectra: Vec<RawSpectrum> = (0..500).map(|i| make_spectrum(i, &config, 200)).collect();
    c.bench_function("summarize_all", |b| {
        b.iter(|| summarize_all(black_box(&spectra), DetailLevel::Full))
    });
}

criterion_group!(benches, update, batch);
criterion_main!(benches);
