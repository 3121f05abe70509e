//bollinger bands: sma middle band +/- `num_std` population standard deviations

use statrs::statistics::Statistics;

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

pub fn bollinger(closes: &[f64], window: usize, num_std: f64) -> BollingerBands {
    let n = closes.len();
    let mut bands = BollingerBands {
        upper: vec![None; n],
        middle: vec![None; n],
        lower: vec![None; n],
    };
    if window == 0 || n < window {
        return bands;
    }

    for (i, slice) in closes.windows(window).enumerate() {
        let idx = i + window - 1;
        let middle = slice.iter().sum::<f64>() / window as f64;
        //divide by N, not N - 1
        let std_dev = slice.population_std_dev();

        bands.middle[idx] = Some(middle);
        bands.upper[idx] = Some(middle + num_std * std_dev);
        bands.lower[idx] = Some(middle - num_std * std_dev);
    }

    bands
}
