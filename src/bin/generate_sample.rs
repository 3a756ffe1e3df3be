use anyhow::{Context, Result};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Heavy-tailed value in `[lo, lo * 10^decades)`.
    fn log_uniform(&mut self, lo: f64, decades: f64) -> f64 {
        lo * 10f64.powf(self.next_f64() * decades)
    }
}

/// SH2 chapter → (SH4 products, typical US$ per kg).
const CATALOG: &[(&str, &[&str], f64)] = &[
    ("Calçados, polainas e artefatos semelhantes", &["Calçados de couro natural", "Calçados de borracha ou plástico", "Partes de calçados"], 35.0),
    ("Café, chá, mate e especiarias", &["Café não torrado", "Café torrado", "Pimenta seca"], 4.5),
    ("Peles, exceto as peles com pelo, e couros", &["Couros curtidos de bovinos", "Couros preparados após curtimenta"], 9.0),
    ("Reatores nucleares, caldeiras, máquinas", &["Motores de pistão", "Bombas para líquidos", "Partes de máquinas"], 60.0),
    ("Açúcares e produtos de confeitaria", &["Açúcar de cana", "Produtos de confeitaria sem cacau"], 0.5),
    ("Sucos de frutas", &["Suco de laranja"], 1.2),
    ("Móveis e suas partes", &["Assentos", "Outros móveis"], 12.0),
    ("Pedras preciosas e semipreciosas", &["Pedras preciosas lapidadas"], 900.0),
];

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let cities = [
        "Franca", "Campinas", "Santos", "São Paulo", "Ribeirão Preto",
        "Belo Horizonte", "Curitiba", "Novo Hamburgo", "Vitória", "Recife",
    ];

    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "exportacoes_franca.csv".to_string());
    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(["City", "SH2 Description", "SH4 Description", "US$ FOB", "Net Weight"])?;

    let n_rows = 2_000;
    for _ in 0..n_rows {
        let city = rng.pick(&cities);
        let (sh2, products, price_per_kg) = rng.pick(CATALOG);
        let sh4 = rng.pick(*products);

        let weight = rng.log_uniform(10.0, 4.0);
        let price = price_per_kg * (0.5 + rng.next_f64());
        let fob = weight * price;

        writer.write_record([
            city.to_string(),
            sh2.to_string(),
            sh4.to_string(),
            format!("{fob:.2}"),
            format!("{weight:.2}"),
        ])?;
    }
    writer.flush().context("flushing CSV")?;

    println!("Wrote {n_rows} trade rows to {output_path}");
    Ok(())
}
