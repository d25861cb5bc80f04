//! Simple path tracer example.
//!
//! Renders a small sphere field with diffuse, metal and glass materials and
//! saves the result to PPM format.

use ember_renderer::{
    render, BvhNode, Camera, Color, Dielectric, Hittable, Lambertian, Metal, NoiseTexture,
    RenderConfig, Sphere, Vec3,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::sync::Arc;

fn main() {
    env_logger::init();

    let config = RenderConfig {
        width: 800,
        height: 450,
        samples_per_pixel: 50,
        max_depth: 10,
        gamma: 0.5,
        background: Color::new(0.5, 0.7, 1.0),
        seed: 0,
    };

    let mut camera = Camera::new()
        .with_position(
            Vec3::new(13.0, 2.0, 3.0), // look_from
            Vec3::new(0.0, 0.0, 0.0),  // look_at
            Vec3::new(0.0, 1.0, 0.0),  // vup
        )
        .with_lens(20.0, 0.6, 10.0)
        .with_aspect_ratio(config.width as f64 / config.height as f64);
    camera.initialize();

    let start = std::time::Instant::now();
    let world = build_scene(camera.shutter_close());
    println!("Scene built in {:?}", start.elapsed());

    println!(
        "Rendering {}x{} @ {} spp...",
        config.width, config.height, config.samples_per_pixel
    );

    let start = std::time::Instant::now();
    let buffer = render(&camera, &world, &config, None).expect("render failed");
    println!("Rendered in {:?}", start.elapsed());

    let filename = "output.ppm";
    save_ppm(&buffer, config.width, config.height, filename).expect("Failed to save image");
    println!("Saved to {filename}");
}

fn build_scene(time1: f64) -> BvhNode {
    let mut objects: Vec<Box<dyn Hittable>> = Vec::new();
    let mut rng = StdRng::seed_from_u64(2024);

    // Marble ground
    objects.push(Box::new(Sphere::stationary(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Lambertian::textured(Arc::new(NoiseTexture::new(4.0, &mut rng))),
    )));

    // Three main spheres
    objects.push(Box::new(Sphere::stationary(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        Dielectric::new(1.5),
    )));

    objects.push(Box::new(Sphere::stationary(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Lambertian::new(Color::new(0.4, 0.2, 0.1)),
    )));

    objects.push(Box::new(Sphere::stationary(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Metal::new(Color::new(0.7, 0.6, 0.5), 0.0),
    )));

    // Small random spheres
    for a in -5..5 {
        for b in -5..5 {
            let center = Vec3::new(
                a as f64 + 0.9 * rng.gen::<f64>(),
                0.2,
                b as f64 + 0.9 * rng.gen::<f64>(),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose_mat: f64 = rng.gen();
            if choose_mat < 0.8 {
                // Diffuse
                let albedo = Color::new(
                    rng.gen::<f64>() * rng.gen::<f64>(),
                    rng.gen::<f64>() * rng.gen::<f64>(),
                    rng.gen::<f64>() * rng.gen::<f64>(),
                );
                objects.push(Box::new(Sphere::stationary(
                    center,
                    0.2,
                    Lambertian::new(albedo),
                )));
            } else if choose_mat < 0.95 {
                // Metal
                let albedo = Color::new(
                    0.5 + 0.5 * rng.gen::<f64>(),
                    0.5 + 0.5 * rng.gen::<f64>(),
                    0.5 + 0.5 * rng.gen::<f64>(),
                );
                let fuzz = 0.5 * rng.gen::<f64>();
                objects.push(Box::new(Sphere::stationary(
                    center,
                    0.2,
                    Metal::new(albedo, fuzz),
                )));
            } else {
                // Glass
                objects.push(Box::new(Sphere::stationary(center, 0.2, Dielectric::new(1.5))));
            }
        }
    }

    println!("Created {} objects", objects.len());
    BvhNode::new(objects, time1)
}

fn save_ppm(buffer: &[u8], width: u32, height: u32, filename: &str) -> std::io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "P3")?;
    writeln!(writer, "{width} {height}")?;
    writeln!(writer, "255")?;

    for rgb in buffer.chunks_exact(3) {
        writeln!(writer, "{} {} {}", rgb[0], rgb[1], rgb[2])?;
    }

    Ok(())
}
