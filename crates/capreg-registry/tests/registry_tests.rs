// SPDX-FileCopyrightText: 2026 Capreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end registry behavior across every capability kind.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use capreg_core::{Converter, Flavor, ImageWriter, Implementation, LoaderFactory, Penalty, Preloader};
use capreg_registry::{CapabilityRegistry, PreferredOrder};
use capreg_test_utils::fixtures::{descriptor, JPEG, PNG, SVG, TIFF};
use capreg_test_utils::{MockConverter, MockLoaderFactory, MockPreloader, MockWriter};
use proptest::prelude::*;

fn ids<T: Implementation + ?Sized>(list: &[Arc<T>]) -> Vec<String> {
    list.iter().map(|i| i.identity().to_string()).collect()
}

#[test]
fn preloaders_sort_by_priority_and_penalty() {
    let registry = CapabilityRegistry::new();
    let p1 = MockPreloader::new("P1", 10).shared();
    let p2 = MockPreloader::new("P2", 5).shared();
    registry.register_preloader(Arc::clone(&p1)).unwrap();
    registry.register_preloader(Arc::clone(&p2)).unwrap();
    assert_eq!(ids(&registry.sorted_preloaders()), vec!["P2", "P1"]);

    registry.set_penalty("P2", Penalty::Finite(100));
    assert_eq!(ids(&registry.sorted_preloaders()), vec!["P1", "P2"]);

    registry.set_penalty("P1", Penalty::Infinite);
    assert_eq!(ids(&registry.sorted_preloaders()), vec!["P2"]);
    assert_eq!(ids(&registry.preloader_index().entries()), vec!["P2", "P1"]);
}

#[test]
fn best_loader_follows_penalties_and_unregistration() {
    let registry = CapabilityRegistry::new();
    let flavor = Flavor::buffered_image();
    let l1: Arc<dyn LoaderFactory> = MockLoaderFactory::new("L1", PNG, &[flavor.clone()]).with_penalty(10).shared();
    let l2: Arc<dyn LoaderFactory> = MockLoaderFactory::new("L2", PNG, &[flavor.clone()]).with_penalty(5).shared();
    registry.register_loader(Arc::clone(&l1), PNG, &[flavor.clone()]).unwrap();
    registry.register_loader(Arc::clone(&l2), PNG, &[flavor.clone()]).unwrap();

    let best = |r: &CapabilityRegistry| r.best_loader(&descriptor(PNG), &flavor).map(|l| l.identity().to_string());
    assert_eq!(best(&registry), Some("L2".into()));

    registry.unregister_loader(&l2, PNG, &[flavor.clone()]);
    assert_eq!(best(&registry), Some("L1".into()));

    registry.set_penalty("L1", Penalty::Infinite);
    assert_eq!(best(&registry), None);
    assert_eq!(registry.loaders_for_type(PNG).map(|l| l.len()), Some(1));
}

#[test]
fn penalty_set_before_registration_applies_on_arrival() {
    let registry = CapabilityRegistry::new();
    let flavor = Flavor::raw_png();
    registry.set_penalty("org.example.X", Penalty::Infinite);

    let x: Arc<dyn LoaderFactory> = MockLoaderFactory::new("org.example.X", PNG, &[flavor.clone()]).shared();
    assert_eq!(registry.register_loader(Arc::clone(&x), PNG, &[flavor.clone()]).unwrap(), 1);

    assert!(registry.best_loader(&descriptor(PNG), &flavor).is_none());
    assert!(registry.all_loaders(&descriptor(PNG), &flavor).is_none());
    assert_eq!(ids(&registry.loaders_for_type(PNG).unwrap()), vec!["org.example.X"]);

    registry.clear_penalty("org.example.X");
    assert!(registry.best_loader(&descriptor(PNG), &flavor).is_some());
}

#[test]
fn infinite_penalty_excludes_from_all_loaders() {
    let registry = CapabilityRegistry::new();
    let flavor = Flavor::rendered_image();
    for (name, penalty) in [("a", 1), ("b", 2), ("c", 3)] {
        let factory = MockLoaderFactory::new(name, TIFF, &[flavor.clone()]).with_penalty(penalty);
        registry.register_loader(factory.shared(), TIFF, &[flavor.clone()]).unwrap();
    }
    registry.set_penalty("b", Penalty::Infinite);

    let ranked = registry.all_loaders(&descriptor(TIFF), &flavor).unwrap();
    assert_eq!(ids(&ranked), vec!["a", "c"]);
    assert_eq!(registry.loaders_for_type(TIFF).map(|l| l.len()), Some(3));
}

#[test]
fn clearing_a_penalty_restores_the_previous_ranking() {
    let registry = CapabilityRegistry::new();
    let flavor = Flavor::rendered_image();
    for (name, penalty) in [("a", 30), ("b", 10), ("c", 20), ("d", 10)] {
        let factory = MockLoaderFactory::new(name, TIFF, &[flavor.clone()]).with_penalty(penalty);
        registry.register_loader(factory.shared(), TIFF, &[flavor.clone()]).unwrap();
    }
    let ranking = |r: &CapabilityRegistry| ids(&r.all_loaders(&descriptor(TIFF), &flavor).unwrap());
    let before = ranking(&registry);
    assert_eq!(before, vec!["b", "d", "c", "a"]);

    registry.set_penalty("b", Penalty::Finite(50));
    assert_eq!(ranking(&registry), vec!["d", "c", "a", "b"]);

    registry.clear_penalty("b");
    assert_eq!(ranking(&registry), before);
}

#[test]
fn all_loaders_finds_refined_flavors_without_exact_registration() {
    let registry = CapabilityRegistry::new();
    let svg: Arc<dyn LoaderFactory> = MockLoaderFactory::new("batik", SVG, &[Flavor::svg_dom()]).shared();
    registry.register_loader_factory(Arc::clone(&svg)).unwrap();

    assert!(registry.best_loader(&descriptor(SVG), &Flavor::xml_dom()).is_none());
    let all = registry.all_loaders(&descriptor(SVG), &Flavor::xml_dom()).unwrap();
    assert_eq!(ids(&all), vec!["batik"]);

    let generic: Arc<dyn LoaderFactory> = MockLoaderFactory::new("dom", SVG, &[Flavor::xml_dom()]).shared();
    registry.register_loader_factory(generic).unwrap();
    assert_eq!(ids(&registry.all_loaders(&descriptor(SVG), &Flavor::svg_dom()).unwrap()), vec!["batik"]);
}

#[test]
fn writer_priority_from_dotted_prefix() {
    let registry = CapabilityRegistry::new();
    registry.replace_preferred_order(PreferredOrder::from_entries([("a.b", "5"), ("a", "1")]));
    let abc: Arc<dyn ImageWriter> = MockWriter::new("a.b.C", PNG).shared();
    let axy: Arc<dyn ImageWriter> = MockWriter::new("a.x.Y", PNG).shared();
    let other: Arc<dyn ImageWriter> = MockWriter::new("z.Other", PNG).shared();
    registry.register_writer(Arc::clone(&other)).unwrap();
    registry.register_writer(Arc::clone(&axy)).unwrap();
    registry.register_writer(Arc::clone(&abc)).unwrap();

    assert_eq!(registry.writer_index().priority_of(&abc, PNG), Some(5));
    assert_eq!(ids(&registry.writers_for(PNG)), vec!["a.b.C", "a.x.Y", "z.Other"]);
}

#[test]
fn default_preferred_order_demotes_internal_writers() {
    let registry = CapabilityRegistry::new();
    registry
        .register_writer(MockWriter::new("org.example.writer.internal.PngWriter", PNG).shared())
        .unwrap();
    registry
        .register_writer(MockWriter::new("org.example.writer.imageio.PngWriter", PNG).shared())
        .unwrap();
    registry.register_writer(MockWriter::new("com.vendor.PngWriter", PNG).shared()).unwrap();

    assert_eq!(
        ids(&registry.writers_for(PNG)),
        vec![
            "com.vendor.PngWriter",
            "org.example.writer.imageio.PngWriter",
            "org.example.writer.internal.PngWriter",
        ]
    );
}

#[test]
fn writer_for_falls_through_unusable_writers() {
    let registry = CapabilityRegistry::new();
    let native = MockWriter::new("native", JPEG).non_functional().shared();
    registry.register_writer_with_priority(native.clone(), 10).unwrap();
    registry.register_writer_with_priority(MockWriter::new("pure", JPEG).shared(), 1).unwrap();

    assert_eq!(registry.writer_for(JPEG).map(|w| w.identity().to_string()), Some("pure".into()));
    native.set_functional(true);
    assert_eq!(registry.writer_for(JPEG).map(|w| w.identity().to_string()), Some("native".into()));
}

#[test]
fn converter_modification_counter() {
    let registry = CapabilityRegistry::new();
    let c1: Arc<dyn Converter> = MockConverter::new("C1", &[Flavor::raw_png()], Flavor::rendered_image()).shared();
    let c2: Arc<dyn Converter> = MockConverter::new("C2", &[Flavor::rendered_image()], Flavor::graphics2d()).shared();
    let start = registry.converters_modifications();

    registry.register_converter(Arc::clone(&c1)).unwrap();
    registry.register_converter(Arc::clone(&c2)).unwrap();
    assert!(registry.unregister_converter(&c1));
    assert_eq!(registry.converters_modifications(), start + 3);

    assert!(!registry.unregister_converter(&c1));
    assert_eq!(registry.converters_modifications(), start + 3);
    let listed: Vec<String> = registry.converters().iter().map(|c| c.identity().to_string()).collect();
    assert_eq!(listed, vec!["C2"]);
}

#[test]
fn preload_then_load() {
    let registry = CapabilityRegistry::new();
    registry
        .register_preloader(MockPreloader::new("png-sniffer", 10).recognizing(b"\x89PNG", PNG).shared())
        .unwrap();
    registry
        .register_loader_factory(MockLoaderFactory::new("png", PNG, &[Flavor::raw_png()]).shared())
        .unwrap();

    let found = registry.preload("file:///x.png", b"\x89PNG\r\n").unwrap();
    let loader = registry.best_loader(&found, &Flavor::raw_png()).unwrap();
    assert_eq!(loader.identity(), "png");
}

#[test]
fn slow_probe_does_not_block_registration() {
    let registry = CapabilityRegistry::new();
    registry
        .register_writer(MockWriter::new("slow", PNG).with_probe_delay(Duration::from_millis(400)).shared())
        .unwrap();

    thread::scope(|s| {
        let query = s.spawn(|| registry.writer_for(PNG));
        thread::sleep(Duration::from_millis(50));

        let started = Instant::now();
        registry.register_writer(MockWriter::new("fast", TIFF).shared()).unwrap();
        assert!(registry.writer_for(TIFF).is_some());
        assert!(started.elapsed() < Duration::from_millis(300));

        assert!(query.join().unwrap().is_some());
    });
}

#[test]
fn concurrent_register_and_query() {
    let registry = CapabilityRegistry::new();
    let flavor = Flavor::buffered_image();
    let factories: Vec<Arc<dyn LoaderFactory>> = (0..8)
        .map(|i| {
            let factory: Arc<dyn LoaderFactory> =
                MockLoaderFactory::new(&format!("L{i}"), PNG, &[flavor.clone()]).with_penalty(i).shared();
            factory
        })
        .collect();

    thread::scope(|s| {
        for factory in &factories {
            let registry = &registry;
            let flavor = &flavor;
            s.spawn(move || {
                for _ in 0..50 {
                    registry.register_loader(Arc::clone(factory), PNG, &[flavor.clone()]).unwrap();
                    let _ = registry.best_loader(&descriptor(PNG), flavor);
                    registry.unregister_loader(factory, PNG, &[flavor.clone()]);
                }
                registry.register_loader(Arc::clone(factory), PNG, &[flavor.clone()]).unwrap();
            });
        }
    });

    let listed = registry.loaders_for_type(PNG).unwrap();
    assert_eq!(listed.len(), factories.len());
    let best = registry.best_loader(&descriptor(PNG), &flavor).unwrap();
    assert_eq!(best.identity(), "L0");
}

#[derive(Debug, Clone)]
enum Op {
    Register(usize),
    Unregister(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..6usize).prop_map(Op::Register),
        (0..6usize).prop_map(Op::Unregister),
    ]
}

proptest! {
    #[test]
    fn queries_reflect_the_net_registered_set(ops in proptest::collection::vec(op(), 0..40)) {
        let registry = CapabilityRegistry::new();
        let flavor = Flavor::buffered_image();
        let preloaders: Vec<Arc<dyn Preloader>> = (0..6)
            .map(|i| MockPreloader::new(&format!("p{i}"), (i as i32) % 3).shared())
            .collect();
        let writers: Vec<Arc<dyn ImageWriter>> = (0..6)
            .map(|i| {
                let writer: Arc<dyn ImageWriter> = MockWriter::new(&format!("w{i}"), PNG).shared();
                writer
            })
            .collect();
        let loaders: Vec<Arc<dyn LoaderFactory>> = (0..6)
            .map(|i| {
                let loader: Arc<dyn LoaderFactory> =
                    MockLoaderFactory::new(&format!("l{i}"), PNG, &[flavor.clone()]).shared();
                loader
            })
            .collect();
        let converters: Vec<Arc<dyn Converter>> = (0..6)
            .map(|i| MockConverter::new(&format!("c{i}"), &[Flavor::raw_png()], flavor.clone()).shared())
            .collect();
        let mut expected = BTreeSet::new();
        let mut modifications = registry.converters_modifications();

        for op in ops {
            match op {
                Op::Register(i) => {
                    registry.register_preloader(Arc::clone(&preloaders[i])).unwrap();
                    registry.register_writer(Arc::clone(&writers[i])).unwrap();
                    registry.register_loader_factory(Arc::clone(&loaders[i])).unwrap();
                    if registry.register_converter(Arc::clone(&converters[i])).unwrap() {
                        modifications += 1;
                    }
                    expected.insert(i);
                }
                Op::Unregister(i) => {
                    registry.unregister_preloader(&preloaders[i]);
                    registry.unregister_writer(&writers[i]);
                    registry.unregister_loader_factory(&loaders[i]);
                    if registry.unregister_converter(&converters[i]) {
                        modifications += 1;
                    }
                    expected.remove(&i);
                }
            }

            let want = |prefix: &str| -> BTreeSet<String> {
                expected.iter().map(|i| format!("{prefix}{i}")).collect()
            };

            let sorted = registry.sorted_preloaders();
            let seen: BTreeSet<String> = ids(&sorted).into_iter().collect();
            prop_assert_eq!(sorted.len(), expected.len());
            prop_assert_eq!(seen, want("p"));
            prop_assert!(sorted.windows(2).all(|w| w[0].priority() <= w[1].priority()));

            let written: BTreeSet<String> = ids(&registry.writers_for(PNG)).into_iter().collect();
            prop_assert_eq!(written, want("w"));

            let loaded = registry.loaders_for_type(PNG).unwrap_or_default();
            prop_assert_eq!(loaded.len(), expected.len());
            let loaded: BTreeSet<String> = ids(&loaded).into_iter().collect();
            prop_assert_eq!(loaded, want("l"));

            let snapshot = registry.converters();
            let listed: BTreeSet<String> = snapshot.iter().map(|c| c.identity().to_string()).collect();
            prop_assert_eq!(snapshot.len(), expected.len());
            prop_assert_eq!(listed, want("c"));
            prop_assert_eq!(registry.converters_modifications(), modifications);
            prop_assert_eq!(snapshot.modifications(), modifications);
        }
    }
}
