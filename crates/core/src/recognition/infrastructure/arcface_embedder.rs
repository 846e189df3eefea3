/// ArcFace face embedder using ONNX Runtime.
///
/// Produces 512-d L2-normalized identity embeddings from face crops of any
/// size; crops are resampled to the model's 112x112 input.
use std::path::Path;
use std::sync::Mutex;

use crate::recognition::domain::face_embedder::FaceEmbedder;
use crate::shared::frame::Frame;
use crate::shared::math::l2_normalize;
use crate::shared::onnx_session::load_session;

const INPUT_SIZE: usize = 112;
const NORM_MEAN: f32 = 127.5;
const NORM_STD: f32 = 127.5;

pub struct ArcFaceEmbedder {
    session: Mutex<ort::session::Session>,
}

impl ArcFaceEmbedder {
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let session = load_session(model_path)?;
        Ok(Self {
            session: Mutex::new(session),
        })
    }
}

impl FaceEmbedder for ArcFaceEmbedder {
    fn embed(&self, face: &Frame) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
        if face.width() == 0 || face.height() == 0 {
            return Err("Cannot embed an empty face crop".into());
        }

        let tensor = preprocess(face);
        let input_value = ort::value::Tensor::from_array(tensor)?;
        let mut session = self
            .session
            .lock()
            .map_err(|e| format!("Lock poisoned: {e}"))?;
        let outputs = session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("ArcFace model produced no outputs".into());
        }
        let embedding_array = outputs[0].try_extract_array::<f32>()?;
        let mut embedding = embedding_array
            .as_slice()
            .ok_or("Cannot get embedding slice")?
            .to_vec();

        l2_normalize(&mut embedding);
        Ok(embedding)
    }
}

/// Nearest-neighbour resize to 112x112, `(v - 127.5) / 127.5`, NCHW layout.
fn preprocess(face: &Frame) -> ndarray::Array4<f32> {
    let src = face.as_ndarray();
    let src_w = face.width() as usize;
    let src_h = face.height() as usize;

    let mut tensor = ndarray::Array4::<f32>::zeros((1, 3, INPUT_SIZE, INPUT_SIZE));

    for y in 0..INPUT_SIZE {
        let src_y = (((y as f64 + 0.5) * src_h as f64 / INPUT_SIZE as f64) as usize).min(src_h - 1);
        for x in 0..INPUT_SIZE {
            let src_x =
                (((x as f64 + 0.5) * src_w as f64 / INPUT_SIZE as f64) as usize).min(src_w - 1);
            for c in 0..3 {
                tensor[[0, c, y, x]] = (src[[src_y, src_x, c]] as f32 - NORM_MEAN) / NORM_STD;
            }
        }
    }

    tensor
}
