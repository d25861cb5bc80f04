//! End-to-end render properties: BVH equivalence against a linear scan and
//! deterministic output under a fixed seed.

use ember_renderer::{
    render, BvhNode, Camera, Color, HitRecord, Hittable, HittableList, Interval, Lambertian,
    Ray, RenderConfig, Sphere, Vec3,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn random_sphere_scene(rng: &mut StdRng, count: usize) -> Vec<Box<dyn Hittable>> {
    (0..count)
        .map(|_| {
            let center = Vec3::new(
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
            );
            let radius = rng.gen_range(0.1..1.5);
            Box::new(Sphere::stationary(
                center,
                radius,
                Lambertian::new(Color::splat(0.5)),
            )) as Box<dyn Hittable>
        })
        .collect()
}

#[test]
fn bvh_matches_brute_force_scan() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(1234);

    // The same scene twice: once behind the BVH, once as a plain list
    let mut list = HittableList::new();
    for sphere in random_sphere_scene(&mut rng, 64) {
        list.add(sphere);
    }
    let mut rng2 = StdRng::seed_from_u64(1234);
    let bvh = BvhNode::new(random_sphere_scene(&mut rng2, 64), 1.0);

    let mut query_rng = StdRng::seed_from_u64(99);
    let mut agree_hits = 0;
    for _ in 0..500 {
        let origin = Vec3::new(
            query_rng.gen_range(-15.0..15.0),
            query_rng.gen_range(-15.0..15.0),
            query_rng.gen_range(-15.0..15.0),
        );
        let direction = Vec3::new(
            query_rng.gen_range(-1.0..1.0),
            query_rng.gen_range(-1.0..1.0),
            query_rng.gen_range(-1.0..1.0),
        );
        if direction.length_squared() < 1e-6 {
            continue;
        }
        let ray = Ray::new_simple(origin, direction);
        let ray_t = Interval::new(0.001, f64::INFINITY);

        let mut rec_list = HitRecord::default();
        let mut rec_bvh = HitRecord::default();
        let hit_list = list.hit(&ray, ray_t, &mut rec_list, &mut query_rng);
        let hit_bvh = bvh.hit(&ray, ray_t, &mut rec_bvh, &mut query_rng);

        assert_eq!(hit_list, hit_bvh);
        if hit_list {
            assert!(
                (rec_list.t - rec_bvh.t).abs() < 1e-9,
                "closest hit diverged: {} vs {}",
                rec_list.t,
                rec_bvh.t
            );
            agree_hits += 1;
        }
    }
    // Undirected rays against this scene land roughly 7-8% of the time; the
    // check only guards against a degenerate all-miss run
    assert!(agree_hits > 25, "only {agree_hits} rays hit the scene");
}

fn tiny_sphere_render(seed: u64) -> Vec<u8> {
    let world = BvhNode::new(
        vec![Box::new(Sphere::stationary(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            Lambertian::new(Color::ONE),
        ))],
        1.0,
    );

    let mut camera = Camera::new()
        .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
        .with_lens(90.0, 0.0, 1.0)
        .with_aspect_ratio(1.0);
    camera.initialize();

    let config = RenderConfig {
        width: 2,
        height: 2,
        samples_per_pixel: 1,
        max_depth: 1,
        gamma: 0.5,
        background: Color::ZERO,
        seed,
    };

    render(&camera, &world, &config, None).unwrap()
}

#[test]
fn fixed_seed_render_is_reproducible() {
    init_logging();

    let first = tiny_sphere_render(7);
    let second = tiny_sphere_render(7);
    assert_eq!(first, second);
    assert_eq!(first.len(), 2 * 2 * 3);

    // A white Lambertian sphere under a black background at depth 1 yields
    // a black image: every camera ray either escapes to the background or
    // scatters into a contribution cut off by the depth limit.
    assert!(first.iter().all(|&b| b == 0));
}

#[test]
fn larger_render_is_reproducible_and_nontrivial() {
    init_logging();

    let world = BvhNode::new(
        vec![
            Box::new(Sphere::stationary(
                Vec3::new(0.0, -100.5, -1.0),
                100.0,
                Lambertian::new(Color::new(0.8, 0.8, 0.0)),
            )) as Box<dyn Hittable>,
            Box::new(Sphere::stationary(
                Vec3::new(0.0, 0.0, -1.0),
                0.5,
                Lambertian::new(Color::new(0.1, 0.2, 0.5)),
            )),
        ],
        1.0,
    );

    let mut camera = Camera::new()
        .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
        .with_lens(90.0, 0.0, 1.0)
        .with_aspect_ratio(16.0 / 9.0);
    camera.initialize();

    let config = RenderConfig {
        width: 32,
        height: 18,
        samples_per_pixel: 4,
        max_depth: 8,
        gamma: 0.5,
        background: Color::new(0.7, 0.8, 1.0),
        seed: 42,
    };

    let first = render(&camera, &world, &config, None).unwrap();
    let second = render(&camera, &world, &config, None).unwrap();
    assert_eq!(first, second);

    // Sky background must show up as non-black pixels
    assert!(first.iter().any(|&b| b > 0));
}
