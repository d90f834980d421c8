// ============================================================
// Layer 5 — BERT Encoder
// ============================================================
// The encoder every head sits on:
//
//   token ids ──► word emb ─┐
//   position ids ► pos emb ─┼─► sum ► LayerNorm ► dropout
//   segment ids ─► type emb ┘                 │
//                                             ▼
//                          N × EncoderBlock (post-LN)
//                                             │
//                 sequence_output [batch, seq_len, hidden]
//                                             │
//                       first token ► dense ► tanh
//                                             │
//                      pooled_output [batch, hidden]
//
// Each EncoderBlock is:
//   h = attention_norm(x + dropout(attention(x)))
//   y = output_norm(h + dropout(output(gelu(intermediate(h)))))
//
// Dropout here uses the same rule as everywhere in Burn:
// it only fires on an autodiff backend. `model.valid()`
// gives the deterministic evaluation model.
//
// Reference: Devlin et al. (2019) BERT
//            Burn Book §3 (Building Blocks)

use anyhow::{ensure, Result};
use burn::{
    nn::{
        attention::{MhaInput, MultiHeadAttention, MultiHeadAttentionConfig},
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        Initializer,
        LayerNorm, LayerNormConfig,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::{gelu, tanh},
};
use serde::{Deserialize, Serialize};

use crate::domain::TokenBatch;
use crate::ml::input::EncoderInput;

// ─── Configuration ────────────────────────────────────────────────────────────
/// Encoder architecture, read from a `bert_config.json`.
///
/// Field names follow the JSON files published with the
/// Google BERT checkpoints, so those files load unchanged.
/// Keys this encoder does not use (`directionality`,
/// `pooler_fc_size`, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BertConfig {
    pub vocab_size:              usize,
    pub hidden_size:             usize,
    pub num_hidden_layers:       usize,
    pub num_attention_heads:     usize,
    pub intermediate_size:       usize,
    pub max_position_embeddings: usize,

    #[serde(default = "default_type_vocab_size")]
    pub type_vocab_size: usize,

    #[serde(default = "default_hidden_act")]
    pub hidden_act: String,

    #[serde(default = "default_dropout")]
    pub hidden_dropout_prob: f64,

    #[serde(default = "default_dropout")]
    pub attention_probs_dropout_prob: f64,

    #[serde(default = "default_initializer_range")]
    pub initializer_range: f64,

    #[serde(default = "default_layer_norm_eps")]
    pub layer_norm_eps: f64,
}

fn default_type_vocab_size() -> usize { 2 }
fn default_hidden_act() -> String { "gelu".to_string() }
fn default_dropout() -> f64 { 0.1 }
fn default_initializer_range() -> f64 { 0.02 }
fn default_layer_norm_eps() -> f64 { 1e-12 }

impl BertConfig {
    /// A two-layer, 32-wide encoder that runs instantly on CPU.
    /// Used by `init` when no config file is given.
    pub fn tiny() -> Self {
        Self {
            vocab_size:                   128,
            hidden_size:                  32,
            num_hidden_layers:            2,
            num_attention_heads:          4,
            intermediate_size:            64,
            max_position_embeddings:      32,
            type_vocab_size:              default_type_vocab_size(),
            hidden_act:                   default_hidden_act(),
            hidden_dropout_prob:          default_dropout(),
            attention_probs_dropout_prob: default_dropout(),
            initializer_range:            default_initializer_range(),
            layer_norm_eps:               default_layer_norm_eps(),
        }
    }

    /// Reject configurations the encoder cannot be built from.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("vocab_size", self.vocab_size),
            ("hidden_size", self.hidden_size),
            ("num_attention_heads", self.num_attention_heads),
            ("intermediate_size", self.intermediate_size),
            ("max_position_embeddings", self.max_position_embeddings),
            ("type_vocab_size", self.type_vocab_size),
        ] {
            ensure!(value > 0, "{name} must be positive");
        }
        ensure!(
            self.hidden_size % self.num_attention_heads == 0,
            "hidden_size ({}) is not divisible by num_attention_heads ({})",
            self.hidden_size,
            self.num_attention_heads
        );
        for (name, p) in [
            ("hidden_dropout_prob", self.hidden_dropout_prob),
            ("attention_probs_dropout_prob", self.attention_probs_dropout_prob),
        ] {
            ensure!((0.0..1.0).contains(&p), "{name} must be in [0, 1), got {p}");
        }
        ensure!(
            self.hidden_act == "gelu",
            "unsupported hidden_act '{}' (only gelu is implemented)",
            self.hidden_act
        );
        Ok(())
    }

    /// Check that every index in `batch` falls inside the embedding
    /// table it selects from. The tensor library panics on an
    /// out-of-range lookup, so callers holding a batch from outside
    /// the crate check it here first.
    pub fn check_batch(&self, batch: &TokenBatch) -> Result<()> {
        for (name, table, limit) in [
            ("token_idxs", batch.token_idxs(), self.vocab_size),
            ("position_idxs", batch.position_idxs(), self.max_position_embeddings),
            ("token_type_idxs", batch.token_type_idxs(), self.type_vocab_size),
        ] {
            for (row, ids) in table.iter().enumerate() {
                if let Some(&id) = ids.iter().find(|&&id| id < 0 || id as usize >= limit) {
                    anyhow::bail!("{name} row {row} holds {id}, outside 0..{limit}");
                }
            }
        }
        Ok(())
    }

    /// Build a randomly initialised encoder.
    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<BertModel<B>> {
        self.validate()?;

        let init = Initializer::Normal { mean: 0.0, std: self.initializer_range };
        let embeddings = BertEmbeddings {
            word_embeddings: EmbeddingConfig::new(self.vocab_size, self.hidden_size)
                .with_initializer(init.clone())
                .init(device),
            position_embeddings: EmbeddingConfig::new(self.max_position_embeddings, self.hidden_size)
                .with_initializer(init.clone())
                .init(device),
            token_type_embeddings: EmbeddingConfig::new(self.type_vocab_size, self.hidden_size)
                .with_initializer(init.clone())
                .init(device),
            layer_norm: self.layer_norm(device),
            dropout:    DropoutConfig::new(self.hidden_dropout_prob).init(),
        };
        let layers: Vec<EncoderBlock<B>> = (0..self.num_hidden_layers)
            .map(|_| self.build_encoder_block(device, &init))
            .collect();
        let pooler = BertPooler {
            dense: LinearConfig::new(self.hidden_size, self.hidden_size)
                .with_initializer(init)
                .init(device),
        };

        tracing::debug!(
            "Built encoder: {} layers, hidden={}, heads={}",
            self.num_hidden_layers, self.hidden_size, self.num_attention_heads
        );
        Ok(BertModel { embeddings, layers, pooler, hidden_size: self.hidden_size })
    }

    fn build_encoder_block<B: Backend>(
        &self,
        device: &B::Device,
        init:   &Initializer,
    ) -> EncoderBlock<B> {
        let linear = |d_in: usize, d_out: usize| -> Linear<B> {
            LinearConfig::new(d_in, d_out)
                .with_initializer(init.clone())
                .init(device)
        };
        EncoderBlock {
            attention: MultiHeadAttentionConfig::new(self.hidden_size, self.num_attention_heads)
                .with_dropout(self.attention_probs_dropout_prob)
                .with_initializer(init.clone())
                .init(device),
            attention_norm: self.layer_norm(device),
            intermediate:   linear(self.hidden_size, self.intermediate_size),
            output:         linear(self.intermediate_size, self.hidden_size),
            output_norm:    self.layer_norm(device),
            dropout:        DropoutConfig::new(self.hidden_dropout_prob).init(),
        }
    }

    fn layer_norm<B: Backend>(&self, device: &B::Device) -> LayerNorm<B> {
        LayerNormConfig::new(self.hidden_size)
            .with_epsilon(self.layer_norm_eps)
            .init(device)
    }
}

// ─── Embeddings ───────────────────────────────────────────────────────────────
#[derive(Module, Debug)]
pub struct BertEmbeddings<B: Backend> {
    pub word_embeddings:       Embedding<B>,
    pub position_embeddings:   Embedding<B>,
    pub token_type_embeddings: Embedding<B>,
    pub layer_norm:            LayerNorm<B>,
    pub dropout:               Dropout,
}

impl<B: Backend> BertEmbeddings<B> {
    /// [batch, seq_len] ×3 → [batch, seq_len, hidden]
    pub fn forward(&self, input: EncoderInput<B>) -> Tensor<B, 3> {
        let EncoderInput { token_idxs, position_idxs, token_type_idxs } = input;

        let words     = self.word_embeddings.forward(token_idxs);
        let positions = self.position_embeddings.forward(position_idxs);
        let segments  = self.token_type_embeddings.forward(token_type_idxs);

        self.dropout.forward(self.layer_norm.forward(words + positions + segments))
    }
}

// ─── Encoder block ────────────────────────────────────────────────────────────
/// One BERT layer, post-LayerNorm: each sub-layer's output goes
/// through `hidden_dropout_prob` dropout, is added back to its
/// input, then normalised. Attention dropout is applied inside
/// `attention` with `attention_probs_dropout_prob`.
#[derive(Module, Debug)]
pub struct EncoderBlock<B: Backend> {
    pub attention:      MultiHeadAttention<B>,
    pub attention_norm: LayerNorm<B>,
    /// hidden → intermediate, followed by GELU
    pub intermediate:   Linear<B>,
    /// intermediate → hidden
    pub output:         Linear<B>,
    pub output_norm:    LayerNorm<B>,
    pub dropout:        Dropout,
}

impl<B: Backend> EncoderBlock<B> {
    /// [batch, seq_len, hidden] → [batch, seq_len, hidden]
    pub fn forward(&self, hidden: Tensor<B, 3>) -> Tensor<B, 3> {
        let attended = self.attention.forward(MhaInput::self_attn(hidden.clone())).context;
        let hidden = self.residual(&self.attention_norm, hidden, attended);

        let expanded = gelu(self.intermediate.forward(hidden.clone()));
        let projected = self.output.forward(expanded);
        self.residual(&self.output_norm, hidden, projected)
    }

    /// LN(input + dropout(sublayer_out))
    fn residual(
        &self,
        norm:         &LayerNorm<B>,
        input:        Tensor<B, 3>,
        sublayer_out: Tensor<B, 3>,
    ) -> Tensor<B, 3> {
        norm.forward(input + self.dropout.forward(sublayer_out))
    }
}

// ─── Pooler ───────────────────────────────────────────────────────────────────
/// Summarises a sequence by its first ([CLS]) token.
#[derive(Module, Debug)]
pub struct BertPooler<B: Backend> {
    pub dense: Linear<B>,
}

impl<B: Backend> BertPooler<B> {
    /// [batch, seq_len, hidden] → [batch, hidden]
    pub fn forward(&self, sequence_output: Tensor<B, 3>) -> Tensor<B, 2> {
        let [batch_size, _, hidden] = sequence_output.dims();
        let first_token = sequence_output
            .slice([0..batch_size, 0..1, 0..hidden])
            .reshape([batch_size, hidden]);
        tanh(self.dense.forward(first_token))
    }
}

// ─── Model ────────────────────────────────────────────────────────────────────
#[derive(Module, Debug)]
pub struct BertModel<B: Backend> {
    pub embeddings:  BertEmbeddings<B>,
    pub layers:      Vec<EncoderBlock<B>>,
    pub pooler:      BertPooler<B>,
    pub hidden_size: usize,
}

/// Both views of an encoded batch.
#[derive(Debug, Clone)]
pub struct EncoderOutput<B: Backend> {
    /// [batch, seq_len, hidden]
    pub sequence_output: Tensor<B, 3>,
    /// [batch, hidden]
    pub pooled_output:   Tensor<B, 2>,
}

impl<B: Backend> BertModel<B> {
    pub fn forward(&self, input: EncoderInput<B>) -> EncoderOutput<B> {
        let mut x = self.embeddings.forward(input);
        for layer in &self.layers {
            x = layer.forward(x);
        }
        let pooled_output = self.pooler.forward(x.clone());
        EncoderOutput { sequence_output: x, pooled_output }
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }
}
