//! Feature showcase scene.
//!
//! Assembles a scene exercising every primitive and material, renders it
//! in parallel, and saves the result to PPM format.

use anyhow::Result;
use lux_renderer::{
    box_sides, Bitmap, BvhNode, Camera, Color, ConstantMedium, Material, PrimitiveList, Quad,
    RayTracer, RenderConfig, RotateY, Sphere, Texture, Translate, Vec3, write_ppm,
};
use rand::Rng;
use std::fs::File;
use std::io::BufWriter;
use std::sync::Arc;
use std::time::Instant;

fn main() -> Result<()> {
    env_logger::init();

    let width = 800;
    let height = 450;

    let mut tracer = RayTracer::new(width, height)?;
    tracer.config = RenderConfig {
        samples_per_pixel: 100,
        max_depth: 50,
        background: Color::new(0.7, 0.8, 1.0),
        use_sky_gradient: true,
        seed: 0,
    };

    tracer.set_camera(
        Camera::new()
            .with_position(
                Vec3::new(13.0, 2.0, 3.0),
                Vec3::new(0.0, 0.5, 0.0),
                Vec3::Y,
            )
            .with_lens(25.0, 0.4, 12.0),
    );

    let start = Instant::now();
    build_scene(&mut tracer);
    log::info!("scene built in {:?}", start.elapsed());

    println!(
        "Rendering {}x{} @ {} spp...",
        width, height, tracer.config.samples_per_pixel
    );
    let start = Instant::now();
    tracer.render_parallel();
    println!("Rendered in {:?}", start.elapsed());

    let filename = "output.ppm";
    let file = File::create(filename)?;
    let mut writer = BufWriter::new(file);
    write_ppm(&mut writer, width, height, tracer.rgba_data())?;
    println!("Saved to {}", filename);

    Ok(())
}

fn build_scene(tracer: &mut RayTracer) {
    let mut objects = PrimitiveList::new();

    // Checkered ground
    let checker = Arc::new(Texture::checker(
        0.5,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ));
    let ground: Arc<Material> = Material::lambertian_textured(checker).into();
    objects.add(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, ground));

    // Grid of small random spheres
    let mut rng = rand::thread_rng();
    for a in -6..6 {
        for b in -6..6 {
            let center = Vec3::new(
                a as f64 + 0.9 * rng.gen::<f64>(),
                0.2,
                b as f64 + 0.9 * rng.gen::<f64>(),
            );
            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose_mat: f64 = rng.gen();
            let material: Arc<Material> = if choose_mat < 0.8 {
                let albedo = Color::new(
                    rng.gen::<f64>() * rng.gen::<f64>(),
                    rng.gen::<f64>() * rng.gen::<f64>(),
                    rng.gen::<f64>() * rng.gen::<f64>(),
                );
                Material::lambertian(albedo).into()
            } else if choose_mat < 0.95 {
                let albedo = Color::new(
                    0.5 + 0.5 * rng.gen::<f64>(),
                    0.5 + 0.5 * rng.gen::<f64>(),
                    0.5 + 0.5 * rng.gen::<f64>(),
                );
                Material::metal(albedo, 0.5 * rng.gen::<f64>()).into()
            } else {
                Material::dielectric(1.5).into()
            };
            objects.add(Sphere::new(center, 0.2, material));
        }
    }

    // Feature spheres: glass, marble, mirror, and a UV test image
    objects.add(Sphere::new(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        Material::dielectric(1.5).into(),
    ));
    objects.add(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Material::lambertian_textured(Arc::new(Texture::noise_tinted(
            Color::new(0.4, 0.2, 0.1),
            4.0,
        )))
        .into(),
    ));
    objects.add(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Material::metal(Color::new(0.7, 0.6, 0.5), 0.0).into(),
    ));
    objects.add(Sphere::new(
        Vec3::new(-2.0, 0.5, 2.5),
        0.5,
        Material::lambertian_textured(Arc::new(Texture::image(Arc::new(uv_test_bitmap())))).into(),
    ));

    // Planar shapes behind the feature spheres
    let backdrop: Arc<Material> = Material::lambertian(Color::new(0.8, 0.4, 0.2)).into();
    objects.add(Quad::new(
        Vec3::new(-1.0, 2.0, -3.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 2.0, 0.0),
        backdrop.clone(),
    ));
    objects.add(Quad::triangle(
        Vec3::new(2.0, 2.0, -3.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 2.0, 0.0),
        backdrop.clone(),
    ));
    objects.add(Quad::annulus(
        Vec3::new(-4.0, 3.0, -3.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 2.0, 0.0),
        0.5,
        backdrop,
    ));

    // A rotated, translated emissive box
    let light_box = box_sides(
        Vec3::new(-1.0, 0.0, -6.0),
        Vec3::new(1.0, 2.0, -5.0),
        Material::diffuse_light(Color::new(3.0, 2.7, 2.4)).into(),
    );
    objects.add(Translate::new(
        RotateY::new(light_box, -18.0),
        Vec3::new(-3.0, 0.0, 0.0),
    ));

    // A foggy sphere
    objects.add(ConstantMedium::from_color(
        Sphere::new(
            Vec3::new(3.0, 0.75, 2.5),
            0.75,
            Material::dielectric(1.5).into(),
        ),
        0.6,
        Color::new(0.2, 0.4, 0.9),
    ));

    // Overhead area light
    objects.add(Quad::new(
        Vec3::new(-5.0, 8.0, -5.0),
        Vec3::new(10.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 10.0),
        Material::diffuse_light(Color::new(2.0, 2.0, 2.0)).into(),
    ));

    log::info!("scene holds {} primitives", objects.len());
    tracer.world_mut().clear();
    tracer.world_mut().add(BvhNode::from_list(objects));
}

/// Procedural stand-in for a decoded UV test image: an 8x8 color grid.
fn uv_test_bitmap() -> Bitmap {
    let size = 8usize;
    let mut pixels = Vec::with_capacity(size * size);
    for y in 0..size {
        for x in 0..size {
            let r = x as f64 / (size - 1) as f64;
            let g = y as f64 / (size - 1) as f64;
            let b = if (x + y) % 2 == 0 { 0.9 } else { 0.1 };
            pixels.push(Color::new(r, g, b));
        }
    }
    Bitmap::new(size, size, pixels)
}
